//! Rule-based field extractors and validators for visure camerali.

pub mod ateco;
pub mod oggetto;
pub mod partita_iva;
pub mod patterns;
pub mod registry;

pub use ateco::{AtecoExtractor, extract_ateco, normalize_ateco, validate_ateco};
pub use oggetto::{OggettoExtractor, extract_oggetto, validate_oggetto};
pub use partita_iva::{
    PartitaIvaExtractor, extract_partita_iva, has_valid_check_digit, validate_partita_iva,
};
pub use registry::extract_registry_details;

use regex::Regex;
use tracing::{debug, trace};

use crate::models::{Field, FieldCandidate, FieldOutcome, ValidatedField};

/// Trait for label-anchored field extractors.
///
/// Patterns are tried in order; the first one that matches anywhere in the
/// text supplies the candidate. Later patterns are never consulted once one
/// has matched, even if its candidate is later rejected.
pub trait FieldExtractor {
    /// The field this extractor produces.
    fn field(&self) -> Field;

    /// Ordered patterns, each capturing the candidate in group 1.
    fn patterns(&self) -> &[&'static Regex];

    /// Post-process a raw capture.
    fn clean(&self, raw: &str) -> String {
        raw.trim().to_string()
    }

    /// Extract the raw candidate for this field.
    fn extract(&self, text: &str) -> FieldCandidate {
        match patterns::first_capture(self.patterns(), text) {
            Some((idx, raw)) => {
                trace!("{} matched pattern #{}: {:?}", self.field(), idx, raw);
                FieldCandidate::found(self.field(), self.clean(raw))
            }
            None => FieldCandidate::absent(self.field()),
        }
    }
}

/// Apply the field's acceptance rule to a candidate.
pub fn validate(candidate: &FieldCandidate) -> ValidatedField {
    let outcome = match candidate.raw.as_deref() {
        None => FieldOutcome::NotFound,
        Some(raw) => match candidate.field {
            Field::PartitaIva => validate_partita_iva(raw),
            Field::CodiceAteco => validate_ateco(raw),
            Field::OggettoSociale => validate_oggetto(raw),
        },
    };

    if let FieldOutcome::Invalid(reason) = &outcome {
        debug!("Rejected {} candidate: {}", candidate.field, reason);
    }

    ValidatedField::new(candidate.field, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_distinguishes_absent_from_rejected() {
        let absent = validate(&FieldCandidate::absent(Field::CodiceAteco));
        let rejected = validate(&FieldCandidate::found(Field::CodiceAteco, "2024"));
        let accepted = validate(&FieldCandidate::found(Field::CodiceAteco, "68.31"));

        assert_eq!(absent.status(), FieldStatus::NotFound);
        assert_eq!(rejected.status(), FieldStatus::InvalidFormat);
        assert_eq!(accepted.value(), Some("68.31"));
    }

    #[test]
    fn test_first_matching_pattern_is_final() {
        // "Oggetto sociale" matches first and is too short; the valid
        // "Oggetto:" block further down is never consulted.
        let text = "Oggetto sociale: vedi statuto\n\nOggetto: commercio all'ingrosso di prodotti alimentari";
        let candidate = OggettoExtractor::new().extract(text);
        assert_eq!(candidate.raw.as_deref(), Some("vedi statuto"));
        assert_eq!(validate(&candidate).status(), FieldStatus::InvalidFormat);
    }
}
