//! Extractor tiers.
//!
//! A tier turns acquired text into validated fields and a confidence score.
//! Tiers are tried in configured order by the orchestrator; a tier that
//! returns `Ok` ends the chain, even with zero valid fields.

use std::sync::Arc;

use tracing::{debug, warn};

use super::confidence;
use super::rules::{
    validate, AtecoExtractor, FieldExtractor, OggettoExtractor, PartitaIvaExtractor,
};
use crate::error::TierError;
use crate::models::{ConfidenceScore, RawText, RegistryDetails, ValidatedField};

#[cfg(feature = "full-tier")]
use super::rules::extract_registry_details;

/// Name of the strict tier.
pub const STRICT_TIER: &str = "strict";

/// Name of the richer tier.
pub const FULL_TIER: &str = "full";

/// Everything one tier produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierOutput {
    pub partita_iva: ValidatedField,
    pub codice_ateco: ValidatedField,
    pub oggetto_sociale: ValidatedField,
    pub confidence: ConfidenceScore,
    pub registry: Option<RegistryDetails>,
}

impl TierOutput {
    /// Build output from validated fields, scoring them.
    pub fn scored(
        partita_iva: ValidatedField,
        codice_ateco: ValidatedField,
        oggetto_sociale: ValidatedField,
    ) -> Self {
        let confidence = confidence::score(&[&partita_iva, &codice_ateco, &oggetto_sociale]);
        Self {
            partita_iva,
            codice_ateco,
            oggetto_sociale,
            confidence,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: RegistryDetails) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// An interchangeable extraction strategy.
pub trait ExtractorTier: Send + Sync {
    /// Tier name, reported as `tier_used`.
    fn name(&self) -> &'static str;

    /// Whether the tier can run.
    fn is_available(&self) -> bool {
        true
    }

    /// Extract and validate the three fields from acquired text.
    fn extract(&self, raw: &RawText) -> Result<TierOutput, TierError>;
}

/// Run three extractors and validate their candidates.
fn run_extractors(
    text: &str,
    piva: &dyn FieldExtractor,
    ateco: &dyn FieldExtractor,
    oggetto: &dyn FieldExtractor,
) -> TierOutput {
    TierOutput::scored(
        validate(&piva.extract(text)),
        validate(&ateco.extract(text)),
        validate(&oggetto.extract(text)),
    )
}

/// Labeled patterns only.
#[derive(Default)]
pub struct StrictTier {
    piva: PartitaIvaExtractor,
    ateco: AtecoExtractor,
    oggetto: OggettoExtractor,
}

impl StrictTier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractorTier for StrictTier {
    fn name(&self) -> &'static str {
        STRICT_TIER
    }

    fn extract(&self, raw: &RawText) -> Result<TierOutput, TierError> {
        let output = run_extractors(raw.text(), &self.piva, &self.ateco, &self.oggetto);
        debug!("Strict tier scored {}", output.confidence.score);
        Ok(output)
    }
}

/// Extended label set plus auxiliary registry fields.
#[cfg(feature = "full-tier")]
pub struct FullTier {
    piva: PartitaIvaExtractor,
    ateco: AtecoExtractor,
    oggetto: OggettoExtractor,
}

#[cfg(feature = "full-tier")]
impl FullTier {
    pub fn new() -> Self {
        Self {
            piva: PartitaIvaExtractor::extended(),
            ateco: AtecoExtractor::extended(),
            oggetto: OggettoExtractor::extended(),
        }
    }
}

#[cfg(feature = "full-tier")]
impl Default for FullTier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "full-tier")]
impl ExtractorTier for FullTier {
    fn name(&self) -> &'static str {
        FULL_TIER
    }

    fn extract(&self, raw: &RawText) -> Result<TierOutput, TierError> {
        let text = raw.text();
        let output = run_extractors(text, &self.piva, &self.ateco, &self.oggetto)
            .with_registry(extract_registry_details(text));
        debug!("Full tier scored {}", output.confidence.score);
        Ok(output)
    }
}

/// Create a tier by name. `None` for unknown names or tiers not compiled in.
pub fn create_tier(name: &str) -> Option<Arc<dyn ExtractorTier>> {
    match name.to_lowercase().as_str() {
        STRICT_TIER => Some(Arc::new(StrictTier::new())),
        #[cfg(feature = "full-tier")]
        FULL_TIER => Some(Arc::new(FullTier::new())),
        #[cfg(not(feature = "full-tier"))]
        FULL_TIER => {
            warn!("Extractor tier '{}' is not compiled in", name);
            None
        }
        _ => {
            warn!("Unknown extractor tier '{}'", name);
            None
        }
    }
}

/// Create tiers from configured names, skipping unknown ones.
pub fn tiers_from_names(names: &[String]) -> Vec<Arc<dyn ExtractorTier>> {
    names.iter().filter_map(|name| create_tier(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldStatus, RawText};
    use crate::pdf::BackendKind;
    use pretty_assertions::assert_eq;

    const VISURA: &str = "\
VISURA ORDINARIA SOCIETA' DI CAPITALE
Denominazione: IMMOBILIARE ESEMPIO S.R.L.
Codice fiscale e n.iscr. al Registro Imprese: 04837181009
Partita IVA: 04837181009
Codice ATECO: 68.31
Oggetto sociale: INTERMEDIAZIONE, SERVIZI E CONSULENZE IN MATERIA DI COMPRAVENDITA IMMOBILIARE
CAPITALE SOCIALE: 10.000,00 EURO
";

    fn raw(text: &str) -> RawText {
        RawText::new(text, BackendKind::Lopdf)
    }

    #[test]
    fn test_strict_tier_all_fields() {
        let output = StrictTier::new().extract(&raw(VISURA)).unwrap();
        assert_eq!(output.partita_iva.value(), Some("04837181009"));
        assert_eq!(output.codice_ateco.value(), Some("68.31"));
        assert!(output.oggetto_sociale.value().unwrap().starts_with("INTERMEDIAZIONE"));
        assert_eq!(output.confidence.score, 100);
        assert_eq!(output.registry, None);
    }

    #[test]
    fn test_strict_tier_empty_text_is_ok() {
        let output = StrictTier::new().extract(&RawText::empty()).unwrap();
        assert_eq!(output.confidence.score, 0);
        assert_eq!(output.partita_iva.status(), FieldStatus::NotFound);
    }

    #[test]
    fn test_strict_tier_ignores_unlabeled_codice_fiscale() {
        let text = "Codice fiscale e n.iscr. al Registro Imprese: 04837181009";
        let output = StrictTier::new().extract(&raw(text)).unwrap();
        assert_eq!(output.partita_iva.status(), FieldStatus::NotFound);
    }

    #[cfg(feature = "full-tier")]
    #[test]
    fn test_full_tier_registry_and_extended_labels() {
        let text = "Denominazione: ESEMPIO SOFTWARE S.R.L.\nCodice fiscale e n.iscr. al Registro Imprese: 04837181009";
        let output = FullTier::new().extract(&raw(text)).unwrap();
        assert_eq!(output.partita_iva.value(), Some("04837181009"));
        let registry = output.registry.unwrap();
        assert_eq!(registry.denominazione.as_deref(), Some("ESEMPIO SOFTWARE S.R.L."));
    }

    #[test]
    fn test_create_tier_by_name() {
        assert_eq!(create_tier("strict").map(|t| t.name()), Some(STRICT_TIER));
        assert!(create_tier("ocr").is_none());
        #[cfg(feature = "full-tier")]
        assert_eq!(create_tier("FULL").map(|t| t.name()), Some(FULL_TIER));
    }

    #[test]
    fn test_tiers_from_names_skips_unknown() {
        let names = vec!["bogus".to_string(), "strict".to_string()];
        let tiers = tiers_from_names(&names);
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].name(), STRICT_TIER);
    }
}
