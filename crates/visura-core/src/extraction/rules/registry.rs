//! Auxiliary registry fields: denominazione, forma giuridica, sede legale,
//! PEC and numero REA.
//!
//! These follow the same rule as the scored fields: a candidate that does not
//! match strictly leaves the field empty.

use super::patterns::{
    COMUNE_PROVINCIA, DENOMINAZIONE, FORMA_GIURIDICA, NUMERO_REA, PEC, SEDE_LEGALE,
};
use crate::models::{RegistryDetails, SedeLegale};

/// Words that open a street address rather than a municipality.
const STREET_WORDS: &[&str] = &[
    "VIA", "VIALE", "PIAZZA", "PIAZZALE", "CORSO", "LARGO", "VICOLO", "STRADA", "CONTRADA",
    "LOCALITA", "LOCALITA'", "FRAZIONE", "BORGO",
];

/// Extract every registry field found in `text`.
pub fn extract_registry_details(text: &str) -> RegistryDetails {
    let denominazione = extract_denominazione(text);
    let forma_giuridica = extract_forma_giuridica(text)
        .or_else(|| denominazione.as_deref().and_then(forma_from_name));

    RegistryDetails {
        denominazione,
        forma_giuridica,
        sede_legale: extract_sede_legale(text),
        pec: extract_pec(text),
        numero_rea: extract_numero_rea(text),
    }
}

/// Company name, 5 to 150 characters.
pub fn extract_denominazione(text: &str) -> Option<String> {
    let caps = DENOMINAZIONE.captures(text)?;
    let name = caps[1].trim().to_string();
    let length = name.chars().count();
    (5..=150).contains(&length).then_some(name)
}

/// Legal form from a "Forma giuridica" line, normalized.
pub fn extract_forma_giuridica(text: &str) -> Option<String> {
    let caps = FORMA_GIURIDICA.captures(text)?;
    normalize_forma_giuridica(&caps[1])
}

/// Legal form from the suffix of a company name (`ACME S.R.L.`).
fn forma_from_name(name: &str) -> Option<String> {
    let suffix = name.split_whitespace().last()?;
    let compact = compact(suffix);
    matches!(compact.as_str(), "SRL" | "SRLS" | "SPA" | "SAS" | "SNC")
        .then(|| normalize_forma_giuridica(suffix))
        .flatten()
}

/// Map a free-text or abbreviated legal form to its full registry name.
pub fn normalize_forma_giuridica(raw: &str) -> Option<String> {
    let upper = raw.to_uppercase();
    let compact = compact(raw);

    let forma = if compact.starts_with("SRLS") || upper.contains("LIMITATA SEMPLIFICATA") {
        "SOCIETA' A RESPONSABILITA' LIMITATA SEMPLIFICATA"
    } else if compact.starts_with("SRL") || upper.contains("RESPONSABILITA") {
        "SOCIETA' A RESPONSABILITA' LIMITATA"
    } else if compact.starts_with("SPA") || upper.contains("PER AZIONI") {
        "SOCIETA' PER AZIONI"
    } else if compact.starts_with("SAS") || upper.contains("ACCOMANDITA SEMPLICE") {
        "SOCIETA' IN ACCOMANDITA SEMPLICE"
    } else if compact.starts_with("SNC") || upper.contains("NOME COLLETTIVO") {
        "SOCIETA' IN NOME COLLETTIVO"
    } else if upper.contains("COOPERATIVA") {
        "SOCIETA' COOPERATIVA"
    } else if upper.contains("IMPRESA INDIVIDUALE") || upper.contains("DITTA INDIVIDUALE") {
        "IMPRESA INDIVIDUALE"
    } else {
        return None;
    };

    Some(forma.to_string())
}

fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Registered office municipality and province from `Sede legale COMUNE (PR) ...`.
pub fn extract_sede_legale(text: &str) -> Option<SedeLegale> {
    let line = SEDE_LEGALE.captures(text)?;
    let caps = COMUNE_PROVINCIA.captures(line[1].trim())?;

    let comune = caps[1].trim().to_uppercase();
    let first_word = comune.split_whitespace().next()?;
    if STREET_WORDS.contains(&first_word) || comune.chars().count() < 2 {
        return None;
    }

    Some(SedeLegale {
        comune,
        provincia: caps[2].to_string(),
    })
}

/// Certified e-mail address, lowercased.
pub fn extract_pec(text: &str) -> Option<String> {
    PEC.captures(text).map(|caps| caps[1].to_lowercase())
}

/// Registry number as `PR-NNNNNN`.
pub fn extract_numero_rea(text: &str) -> Option<String> {
    NUMERO_REA
        .captures(text)
        .map(|caps| format!("{}-{}", caps[1].to_uppercase(), &caps[2]))
}
