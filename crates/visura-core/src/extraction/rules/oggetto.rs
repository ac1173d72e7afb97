//! Oggetto sociale (corporate purpose) extraction and validation.

use regex::Regex;

use super::patterns::{
    ATTIVITA_ESERCITATA, DESCRIZIONE_ATTIVITA, OGGETTO_COLON, OGGETTO_SOCIALE, SECTION_HEADING,
};
use super::FieldExtractor;
use crate::models::{Field, FieldOutcome};

/// Minimum length, in characters, of an accepted purpose.
pub const MIN_OGGETTO_CHARS: usize = 30;

/// Maximum length, in characters, of a returned purpose, marker included.
pub const MAX_OGGETTO_CHARS: usize = 500;

/// Appended to truncated purposes.
pub const TRUNCATION_MARKER: &str = "...";

/// A purpose must mention at least one of these.
pub const BUSINESS_VOCABULARY: &[&str] = &[
    "produzione",
    "commercio",
    "servizi",
    "consulenza",
    "vendita",
    "attività",
    "attivita",
    "gestione",
    "intermediazione",
    "commercializzazione",
    "fornitura",
    "prestazione",
    "realizzazione",
    "sviluppo",
];

/// Upper bound on lines kept from one capture.
const MAX_BLOCK_LINES: usize = 40;

/// Oggetto sociale field extractor.
pub struct OggettoExtractor {
    patterns: Vec<&'static Regex>,
}

impl OggettoExtractor {
    /// Labels "Oggetto sociale" and "Oggetto:".
    pub fn new() -> Self {
        Self {
            patterns: vec![&*OGGETTO_SOCIALE, &*OGGETTO_COLON],
        }
    }

    /// Adds "Attività esercitata" and "Descrizione attività".
    pub fn extended() -> Self {
        Self {
            patterns: vec![
                &*OGGETTO_SOCIALE,
                &*OGGETTO_COLON,
                &*ATTIVITA_ESERCITATA,
                &*DESCRIZIONE_ATTIVITA,
            ],
        }
    }
}

impl Default for OggettoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for OggettoExtractor {
    fn field(&self) -> Field {
        Field::OggettoSociale
    }

    fn patterns(&self) -> &[&'static Regex] {
        &self.patterns
    }

    /// Keep the paragraph up to the next section heading.
    fn clean(&self, raw: &str) -> String {
        let mut kept = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            if i > 0 && SECTION_HEADING.is_match(line) {
                break;
            }
            if i >= MAX_BLOCK_LINES {
                break;
            }
            kept.push(line.trim());
        }
        kept.join("\n")
    }
}

/// Extract and validate an oggetto sociale from text.
pub fn extract_oggetto(text: &str) -> Option<String> {
    let candidate = OggettoExtractor::new().extract(text);
    match candidate.raw.as_deref().map(validate_oggetto) {
        Some(FieldOutcome::Valid(value)) => Some(value),
        _ => None,
    }
}

/// Collapse all runs of whitespace to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accept a purpose of at least 30 characters that mentions business activity.
pub fn validate_oggetto(candidate: &str) -> FieldOutcome {
    let collapsed = collapse_whitespace(candidate);
    let length = collapsed.chars().count();

    if length < MIN_OGGETTO_CHARS {
        return FieldOutcome::Invalid(format!(
            "{} characters, at least {} required",
            length, MIN_OGGETTO_CHARS
        ));
    }

    let lowered = collapsed.to_lowercase();
    if !BUSINESS_VOCABULARY.iter().any(|word| lowered.contains(word)) {
        return FieldOutcome::Invalid("no business activity keyword".to_string());
    }

    FieldOutcome::Valid(truncate(collapsed, length))
}

fn truncate(text: String, length: usize) -> String {
    if length <= MAX_OGGETTO_CHARS {
        return text;
    }

    let keep = MAX_OGGETTO_CHARS - TRUNCATION_MARKER.len();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forty_chars_with_keyword_accepted() {
        let purpose = "commercio di articoli per la casa e uffi";
        assert_eq!(purpose.chars().count(), 40);
        assert_eq!(validate_oggetto(purpose), FieldOutcome::Valid(purpose.to_string()));
    }

    #[test]
    fn test_short_purpose_rejected() {
        let purpose = "commercio e vendita.";
        assert_eq!(purpose.chars().count(), 20);
        assert!(matches!(validate_oggetto(purpose), FieldOutcome::Invalid(_)));
        assert_eq!(extract_oggetto("Oggetto: Consulenza"), None);
    }

    #[test]
    fn test_long_text_without_keyword_rejected() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod";
        assert!(matches!(validate_oggetto(text), FieldOutcome::Invalid(_)));
    }

    #[test]
    fn test_long_purpose_truncated() {
        let purpose = format!("produzione {}", "e commercio di beni ".repeat(40));
        let FieldOutcome::Valid(value) = validate_oggetto(&purpose) else {
            panic!("expected valid purpose");
        };
        assert!(value.chars().count() <= MAX_OGGETTO_CHARS);
        assert!(value.ends_with(TRUNCATION_MARKER));
        assert!(value.starts_with("produzione e commercio"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let purpose = "la   produzione\n\te la vendita   di mobili in legno";
        assert_eq!(
            validate_oggetto(purpose),
            FieldOutcome::Valid("la produzione e la vendita di mobili in legno".to_string())
        );
    }

    #[test]
    fn test_extract_stops_at_next_section() {
        let text = "Oggetto sociale: INTERMEDIAZIONE, SERVIZI E CONSULENZE\nIN MATERIA DI COMPRAVENDITA IMMOBILIARE\nCAPITALE SOCIALE: 10.000,00 EURO";
        assert_eq!(
            extract_oggetto(text),
            Some("INTERMEDIAZIONE, SERVIZI E CONSULENZE IN MATERIA DI COMPRAVENDITA IMMOBILIARE".to_string())
        );
    }

    #[test]
    fn test_extract_stops_at_blank_line() {
        let text = "Oggetto:\nla gestione di impianti sportivi e ricreativi\n\nSoci e titolari";
        assert_eq!(
            extract_oggetto(text),
            Some("la gestione di impianti sportivi e ricreativi".to_string())
        );
    }

    #[test]
    fn test_extended_labels() {
        let text = "Attività esercitata: sviluppo e produzione di software gestionale";
        assert_eq!(OggettoExtractor::new().extract(text).raw, None);
        assert!(OggettoExtractor::extended().extract(text).raw.is_some());
    }
}
