//! Partita IVA (Italian VAT number) extraction and validation.

use regex::Regex;
use tracing::debug;

use super::patterns::{CODICE_FISCALE_NUMERIC, PARTITA_IVA_LABELED};
use super::FieldExtractor;
use crate::models::{Field, FieldOutcome};

/// Number of digits in a Partita IVA.
pub const PARTITA_IVA_DIGITS: usize = 11;

/// Partita IVA field extractor.
pub struct PartitaIvaExtractor {
    patterns: Vec<&'static Regex>,
}

impl PartitaIvaExtractor {
    /// Labels "Partita IVA", "P.IVA" and "VAT" only.
    pub fn new() -> Self {
        Self {
            patterns: vec![&*PARTITA_IVA_LABELED],
        }
    }

    /// Also accept the numeric company "Codice fiscale", which registries
    /// print alongside (and usually equal to) the Partita IVA.
    pub fn extended() -> Self {
        Self {
            patterns: vec![&*PARTITA_IVA_LABELED, &*CODICE_FISCALE_NUMERIC],
        }
    }
}

impl Default for PartitaIvaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PartitaIvaExtractor {
    fn field(&self) -> Field {
        Field::PartitaIva
    }

    fn patterns(&self) -> &[&'static Regex] {
        &self.patterns
    }
}

/// Extract and validate a Partita IVA from text.
pub fn extract_partita_iva(text: &str) -> Option<String> {
    let candidate = PartitaIvaExtractor::new().extract(text);
    match candidate.raw.as_deref().map(validate_partita_iva) {
        Some(FieldOutcome::Valid(value)) => Some(value),
        _ => None,
    }
}

/// Accept a candidate that is exactly 11 digits once non-digits are removed.
pub fn validate_partita_iva(candidate: &str) -> FieldOutcome {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != PARTITA_IVA_DIGITS {
        return FieldOutcome::Invalid(format!(
            "expected {} digits, found {}",
            PARTITA_IVA_DIGITS,
            digits.len()
        ));
    }

    if !has_valid_check_digit(&digits) {
        debug!("Partita IVA {} has a non-matching check digit", digits);
    }

    FieldOutcome::Valid(digits)
}

/// Check the Partita IVA control digit (Luhn variant).
///
/// Odd positions are summed as-is; even positions are doubled, subtracting 9
/// when the result exceeds 9. The 11th digit makes the total a multiple of 10.
pub fn has_valid_check_digit(piva: &str) -> bool {
    let digits: Vec<u32> = piva.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != PARTITA_IVA_DIGITS {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .take(10)
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                d
            } else {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            }
        })
        .sum();

    (10 - sum % 10) % 10 == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_labeled() {
        assert_eq!(
            extract_partita_iva("Partita IVA: 04837181009"),
            Some("04837181009".to_string())
        );
        assert_eq!(
            extract_partita_iva("P.IVA 04837181009 - Roma"),
            Some("04837181009".to_string())
        );
        assert_eq!(
            extract_partita_iva("VAT number: IT04837181009"),
            Some("04837181009".to_string())
        );
    }

    #[test]
    fn test_short_number_rejected() {
        let candidate = PartitaIvaExtractor::new().extract("Partita IVA: 123");
        assert_eq!(candidate.raw.as_deref(), Some("123"));
        assert!(matches!(validate_partita_iva("123"), FieldOutcome::Invalid(_)));
        assert_eq!(extract_partita_iva("Partita IVA: 123"), None);
    }

    #[test]
    fn test_non_numeric_not_found() {
        let candidate = PartitaIvaExtractor::new().extract("P.IVA: ABC123456789");
        assert_eq!(candidate.raw, None);
    }

    #[test]
    fn test_validate_strips_separators() {
        assert_eq!(
            validate_partita_iva("048-3718-1009"),
            FieldOutcome::Valid("04837181009".to_string())
        );
        assert!(matches!(validate_partita_iva("048371810091"), FieldOutcome::Invalid(_)));
    }

    #[test]
    fn test_check_digit() {
        assert!(has_valid_check_digit("04837181009"));
        assert!(!has_valid_check_digit("12345678901"));
        assert!(!has_valid_check_digit("1234"));
    }

    #[test]
    fn test_bad_check_digit_still_accepted() {
        assert_eq!(
            validate_partita_iva("12345678901"),
            FieldOutcome::Valid("12345678901".to_string())
        );
    }

    #[test]
    fn test_extended_uses_codice_fiscale() {
        let text = "Codice fiscale e n.iscr. al Registro Imprese: 04837181009";
        assert_eq!(PartitaIvaExtractor::new().extract(text).raw, None);
        assert_eq!(
            PartitaIvaExtractor::extended().extract(text).raw.as_deref(),
            Some("04837181009")
        );
    }
}
