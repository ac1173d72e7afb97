//! Label-anchored regex patterns for visura camerale extraction.
//!
//! Each pattern captures the raw candidate in group 1. Patterns only locate
//! candidates; acceptance is decided by the validators.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Partita IVA
    pub static ref PARTITA_IVA_LABELED: Regex = Regex::new(
        r"(?i)\b(?:partita\s+iva|p\.\s?iva|p\s?iva|vat(?:\s+(?:number|no\.?))?)\b[\s.:]*(?:n\.?\s*)?(?:IT\s?)?(\d+(?:[.\-]\d+)*)"
    ).unwrap();

    pub static ref CODICE_FISCALE_NUMERIC: Regex = Regex::new(
        r"(?i)\b(?:codice\s+fiscale|c\.\s?f\.)[^\n\d]{0,60}?(\d+(?:[.\-]\d+)*)"
    ).unwrap();

    // Codice ATECO
    pub static ref ATECO_LABELED: Regex = Regex::new(
        r"(?i)\b(?:codice\s+ateco|ateco|attivit[àa]'?\s+prevalente)(?:\s+\d{4}\b)?[\s:.\-]*(?:codice\s*:?\s*)?(\d+(?:[.,]\d+|\s?\.\s?\d+){0,3})"
    ).unwrap();

    pub static ref ATECO_CODICE_ATTIVITA: Regex = Regex::new(
        r"(?i)\bcodice\s+(?:di\s+)?attivit[àa]'?[\s:.\-]*(\d+(?:[.,]\d+|\s?\.\s?\d+){0,3})"
    ).unwrap();

    /// `Codice: 47.91.1 - commercio al dettaglio ...` lines of the activity section.
    pub static ref ATECO_CODICE_LINE: Regex = Regex::new(
        r"(?im)^\s*codice\s*:\s*(\d{2}\s?[.,]\s?\d{2}(?:\s?[.,]\s?\d{1,2})?)\s+-"
    ).unwrap();

    // Oggetto sociale
    pub static ref OGGETTO_SOCIALE: Regex = Regex::new(
        r"(?i)\boggetto\s+sociale\b[\s:.\-]*([^\n]+(?:\n[^\n]*\S[^\n]*)*)"
    ).unwrap();

    pub static ref OGGETTO_COLON: Regex = Regex::new(
        r"(?i)\boggetto\s*:\s*([^\n]+(?:\n[^\n]*\S[^\n]*)*)"
    ).unwrap();

    pub static ref ATTIVITA_ESERCITATA: Regex = Regex::new(
        r"(?i)\battivit[àa]'?\s+esercitata\b[\s:.\-]*([^\n]+(?:\n[^\n]*\S[^\n]*)*)"
    ).unwrap();

    pub static ref DESCRIZIONE_ATTIVITA: Regex = Regex::new(
        r"(?i)\bdescrizione\s+(?:dell'\s?)?attivit[àa]'?[\s:.\-]*([^\n]+(?:\n[^\n]*\S[^\n]*)*)"
    ).unwrap();

    /// A line that opens the next labeled section, e.g. `CAPITALE SOCIALE: 10.000`.
    pub static ref SECTION_HEADING: Regex = Regex::new(
        r"^\s*\p{Lu}[\p{L}'’. ]{1,40}:(?:\s|$)"
    ).unwrap();

    // Registry details
    pub static ref DENOMINAZIONE: Regex = Regex::new(
        r"(?im)^\s*denominazione(?:\s+sociale)?\s*:?[ \t]*([^\n]+)$"
    ).unwrap();

    pub static ref FORMA_GIURIDICA: Regex = Regex::new(
        r"(?im)\bforma\s+giuridica\s*:?[ \t]*([^\n]+)$"
    ).unwrap();

    pub static ref SEDE_LEGALE: Regex = Regex::new(
        r"(?im)\bsede\s+legale\s*:?[ \t]*([^\n]+)$"
    ).unwrap();

    /// `[di] COMUNE (PR)` at the start of a sede legale line.
    pub static ref COMUNE_PROVINCIA: Regex = Regex::new(
        r"^(?:(?i:di)\s+)?([\p{L}' ]+?)\s*\(([A-Z]{2})\)"
    ).unwrap();

    pub static ref PEC: Regex = Regex::new(
        r"(?i)\b(?:indirizzo\s+pec|pec|posta\s+elettronica\s+certificata)\b\s*:?\s*([A-Z0-9._%+\-]+@[A-Z0-9.\-]+\.[A-Z]{2,})"
    ).unwrap();

    pub static ref NUMERO_REA: Regex = Regex::new(
        r"(?i)\b(?:numero\s+rea|n\.\s?rea|rea)\b\s*:?\s*([A-Z]{2})\s*-?\s*(\d{5,7})\b"
    ).unwrap();
}

/// First pattern (in order) that matches anywhere in `text`, with its group 1.
pub fn first_capture<'t>(patterns: &[&Regex], text: &'t str) -> Option<(usize, &'t str)> {
    patterns.iter().enumerate().find_map(|(idx, re)| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| (idx, m.as_str()))
    })
}
