//! Confidence scoring over the three canonical fields.

use std::collections::BTreeMap;

use crate::models::{ConfidenceScore, DetailStatus, ValidatedField};

/// Score per number of valid fields. Shares are 33, 33 and 34, so the
/// score depends only on how many fields are valid.
pub const SCORE_BY_VALID_COUNT: [u8; 4] = [0, 33, 66, 100];

/// Canned assessment per number of valid fields.
const ASSESSMENTS: [&str; 4] = [
    "No valid field found",
    "Only one field found and valid",
    "Two of three fields found and valid",
    "All three fields found and valid",
];

/// Score validated fields. Pure: the same outcomes always give the same score.
pub fn score(fields: &[&ValidatedField]) -> ConfidenceScore {
    let mut details = BTreeMap::new();
    let mut valid = 0usize;

    for field in fields {
        let status = if field.is_valid() {
            valid += 1;
            DetailStatus::Valid
        } else {
            DetailStatus::InvalidOrMissing
        };
        details.insert(field.field(), status);
    }

    let bucket = valid.min(SCORE_BY_VALID_COUNT.len() - 1);

    ConfidenceScore {
        score: SCORE_BY_VALID_COUNT[bucket],
        details,
        assessment: ASSESSMENTS[bucket].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, FieldOutcome};
    use pretty_assertions::assert_eq;

    fn field(field: Field, valid: bool) -> ValidatedField {
        let outcome = if valid {
            FieldOutcome::Valid("x".to_string())
        } else {
            FieldOutcome::NotFound
        };
        ValidatedField::new(field, outcome)
    }

    #[test]
    fn test_scores_are_exact() {
        for mask in 0u8..8 {
            let fields: Vec<ValidatedField> = Field::ALL
                .iter()
                .enumerate()
                .map(|(i, f)| field(*f, mask & (1 << i) != 0))
                .collect();
            let refs: Vec<&ValidatedField> = fields.iter().collect();

            let expected = match mask.count_ones() {
                0 => 0,
                1 => 33,
                2 => 66,
                _ => 100,
            };
            assert_eq!(score(&refs).score, expected, "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_details_and_assessment() {
        let piva = field(Field::PartitaIva, true);
        let ateco = ValidatedField::new(Field::CodiceAteco, FieldOutcome::Invalid("2024".into()));
        let oggetto = field(Field::OggettoSociale, true);

        let result = score(&[&piva, &ateco, &oggetto]);
        assert_eq!(result.score, 66);
        assert_eq!(result.assessment, "Two of three fields found and valid");
        assert_eq!(result.details[&Field::PartitaIva], DetailStatus::Valid);
        assert_eq!(result.details[&Field::CodiceAteco], DetailStatus::InvalidOrMissing);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["details"]["codice_ateco"], "invalid_or_missing");
    }

    #[test]
    fn test_all_valid_is_hundred() {
        let fields: Vec<ValidatedField> = Field::ALL.iter().map(|f| field(*f, true)).collect();
        let refs: Vec<&ValidatedField> = fields.iter().collect();
        let result = score(&refs);
        assert_eq!(result.score, 100);
        assert_eq!(result.assessment, "All three fields found and valid");
    }
}
