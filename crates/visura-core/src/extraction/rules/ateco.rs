//! Codice ATECO (activity classification) extraction and validation.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{ATECO_CODICE_ATTIVITA, ATECO_CODICE_LINE, ATECO_LABELED};
use super::FieldExtractor;
use crate::models::{Field, FieldOutcome};

lazy_static! {
    /// One `,` or `.` with optional surrounding whitespace, or a whitespace run.
    static ref SEPARATOR: Regex = Regex::new(r"\s*[,.]\s*|\s+").unwrap();
    static ref ATECO_FORMAT: Regex = Regex::new(r"^\d{2}\.\d{2}(?:\.\d{1,2})?$").unwrap();
}

/// Codice ATECO field extractor.
pub struct AtecoExtractor {
    patterns: Vec<&'static Regex>,
}

impl AtecoExtractor {
    /// Labels "Codice ATECO", "ATECO" and "Attività prevalente".
    pub fn new() -> Self {
        Self {
            patterns: vec![&*ATECO_LABELED],
        }
    }

    /// Adds "Codice attività" and the `Codice: NN.NN - ...` activity lines.
    pub fn extended() -> Self {
        Self {
            patterns: vec![&*ATECO_LABELED, &*ATECO_CODICE_ATTIVITA, &*ATECO_CODICE_LINE],
        }
    }
}

impl Default for AtecoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AtecoExtractor {
    fn field(&self) -> Field {
        Field::CodiceAteco
    }

    fn patterns(&self) -> &[&'static Regex] {
        &self.patterns
    }
}

/// Extract and validate a codice ATECO from text.
pub fn extract_ateco(text: &str) -> Option<String> {
    let candidate = AtecoExtractor::new().extract(text);
    match candidate.raw.as_deref().map(validate_ateco) {
        Some(FieldOutcome::Valid(value)) => Some(value),
        _ => None,
    }
}

/// Rewrite each single separator to a dot. Repeated or stray separators
/// are kept, so they fail the format check.
pub fn normalize_ateco(candidate: &str) -> String {
    SEPARATOR.replace_all(candidate.trim(), ".").into_owned()
}

/// Accept `DD.DD`, `DD.DD.D` or `DD.DD.DD` after normalization.
pub fn validate_ateco(candidate: &str) -> FieldOutcome {
    let normalized = normalize_ateco(candidate);

    if ATECO_FORMAT.is_match(&normalized) {
        FieldOutcome::Valid(normalized)
    } else {
        FieldOutcome::Invalid(format!("'{}' is not a DD.DD[.D[D]] code", normalized))
    }
}

/// Two-digit division of a code (`"62.01.00"` -> `"62"`).
pub fn ateco_division(code: &str) -> Option<&str> {
    code.get(..2).filter(|d| d.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_labeled() {
        assert_eq!(extract_ateco("Codice ATECO: 68.31"), Some("68.31".to_string()));
        assert_eq!(extract_ateco("Codice ATECO 68.31"), Some("68.31".to_string()));
        assert_eq!(
            extract_ateco("Attività prevalente: 62.01.00"),
            Some("62.01.00".to_string())
        );
        assert_eq!(extract_ateco("ATECO 2007: 47.91.1"), Some("47.91.1".to_string()));
    }

    #[test]
    fn test_year_rejected() {
        let candidate = AtecoExtractor::new().extract("Codice ATECO: 2024");
        assert_eq!(candidate.raw.as_deref(), Some("2024"));
        assert!(matches!(validate_ateco("2024"), FieldOutcome::Invalid(_)));
        assert_eq!(extract_ateco("Codice ATECO: 2024"), None);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_ateco("68,31"), "68.31");
        assert_eq!(normalize_ateco(" 68 . 31 "), "68.31");
        assert_eq!(validate_ateco("68,31,0"), FieldOutcome::Valid("68.31.0".to_string()));
        assert_eq!(validate_ateco("68 , 31"), FieldOutcome::Valid("68.31".to_string()));
        assert_eq!(normalize_ateco("68..31"), "68..31");
    }

    #[test]
    fn test_malformed_rejected() {
        for bad in [
            "6.831", "683.1", "68-31", "68.31.123", "68", "ab.cd", "68..31", ".68.31", "68.31.",
            ".68.31.", "68,,31",
        ] {
            assert!(
                matches!(validate_ateco(bad), FieldOutcome::Invalid(_)),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_list_delimiter_not_captured() {
        assert_eq!(extract_ateco("ATECO: 68.31, 2024"), Some("68.31".to_string()));
    }

    #[test]
    fn test_extended_patterns() {
        let text = "Attività\nCodice: 47.91.1 - commercio al dettaglio via internet\nImportanza: primaria";
        assert_eq!(AtecoExtractor::new().extract(text).raw, None);
        assert_eq!(
            AtecoExtractor::extended().extract(text).raw.as_deref(),
            Some("47.91.1")
        );
    }

    #[test]
    fn test_division() {
        assert_eq!(ateco_division("62.01.00"), Some("62"));
        assert_eq!(ateco_division("x"), None);
    }
}
