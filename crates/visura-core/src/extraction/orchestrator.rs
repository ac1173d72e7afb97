//! The extraction pipeline: input gate, text acquisition, tier fallback,
//! enrichment and the response envelope.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::tiers::{tiers_from_names, ExtractorTier, TierOutput};
use crate::enrichment::{AtecoEnricher, CachedEnricher, SectorEnricher};
use crate::error::{panic_message, InputError, Result, TierError, VisuraError};
use crate::models::config::InputConfig;
use crate::models::{
    ExtractionInput, ExtractionMetadata, ExtractionResponse, ExtractionResult, RawText, VisuraConfig,
};
use crate::pdf::BackendSelector;

/// Visura extraction pipeline.
///
/// Stateless across calls: every call acquires its own text and builds its
/// own result. Safe to share between threads.
pub struct VisuraExtractor {
    limits: InputConfig,
    selector: BackendSelector,
    tiers: Vec<Arc<dyn ExtractorTier>>,
    enricher: Option<Arc<dyn AtecoEnricher>>,
}

impl VisuraExtractor {
    /// Create a pipeline with default input limits and no enrichment.
    pub fn new(selector: BackendSelector, tiers: Vec<Arc<dyn ExtractorTier>>) -> Self {
        Self {
            limits: InputConfig::default(),
            selector,
            tiers,
            enricher: None,
        }
    }

    /// Build the pipeline described by a configuration.
    pub fn from_config(config: &VisuraConfig) -> Result<Self> {
        let selector = BackendSelector::from_config(&config.backends);
        let tiers = tiers_from_names(&config.extraction.tiers);

        let mut extractor = Self::new(selector, tiers).with_limits(config.input.clone());

        if config.enrichment.enabled {
            let sectors = match &config.enrichment.mapping_file {
                Some(path) => SectorEnricher::from_file(path).map_err(|e| {
                    VisuraError::Config(format!(
                        "failed to load sector mapping {}: {}",
                        path.display(),
                        e
                    ))
                })?,
                None => SectorEnricher::new(),
            };
            let cached = CachedEnricher::new(Arc::new(sectors), config.enrichment.cache_capacity);
            extractor = extractor.with_enricher(Arc::new(cached));
        }

        info!(
            "Visura extractor initialized: backends={:?}, tiers={:?}, enrichment={}",
            extractor.selector.backends(),
            extractor.tier_names(),
            extractor.enricher.is_some()
        );

        Ok(extractor)
    }

    /// Set input limits.
    pub fn with_limits(mut self, limits: InputConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Attach an activity-code enricher.
    pub fn with_enricher(mut self, enricher: Arc<dyn AtecoEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Names of the configured tiers, in order.
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// Reject out-of-contract input. Content type first, then emptiness,
    /// then size.
    pub fn check_input(&self, input: &ExtractionInput) -> std::result::Result<(), InputError> {
        let content_type = input
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let accepted = self
            .limits
            .accepted_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&content_type));
        if !accepted {
            return Err(InputError::InvalidFileType(input.content_type.clone()));
        }

        if input.declared_size == 0 || input.data.is_empty() {
            return Err(InputError::EmptyFile);
        }

        let size = input.declared_size.max(input.data.len() as u64);
        if size > self.limits.max_file_size {
            return Err(InputError::FileTooLarge {
                size,
                max: self.limits.max_file_size,
            });
        }

        Ok(())
    }

    /// Run the pipeline, returning the full result or the error that ended it.
    pub fn try_extract(&self, input: &ExtractionInput) -> Result<ExtractionResult> {
        let start = Instant::now();

        self.check_input(input)?;

        let available: Vec<&Arc<dyn ExtractorTier>> =
            self.tiers.iter().filter(|t| t.is_available()).collect();
        if available.is_empty() {
            return Err(VisuraError::NoTierAvailable(format!(
                "configured tiers: {:?}",
                self.tier_names()
            )));
        }

        info!("Extracting {} ({} bytes)", input.filename, input.data.len());
        let raw = self.selector.acquire(&input.data);
        if raw.text().is_empty() {
            warn!("No text acquired from {}, continuing with empty text", input.filename);
        }

        let (tier_name, output) = run_tiers(&available, &raw)?;

        let ateco_details = match (&self.enricher, output.codice_ateco.value()) {
            (Some(enricher), Some(code)) => enricher.enrich(code),
            _ => None,
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} with {}+{}: score {} in {}ms",
            input.filename,
            tier_name,
            raw.backend_used(),
            output.confidence.score,
            processing_time_ms
        );

        Ok(ExtractionResult {
            partita_iva: output.partita_iva,
            codice_ateco: output.codice_ateco,
            oggetto_sociale: output.oggetto_sociale,
            confidence: output.confidence,
            registry: output.registry,
            ateco_details,
            metadata: ExtractionMetadata {
                backend_used: raw.backend_used().to_string(),
                tier_used: tier_name.to_string(),
                processing_time_ms,
            },
        })
    }

    /// Run the pipeline and wrap the outcome in the response envelope.
    pub fn extract(&self, input: &ExtractionInput) -> ExtractionResponse {
        match self.try_extract(input) {
            Ok(result) => ExtractionResponse::success(&result),
            Err(e) => {
                warn!("Extraction of {} failed: {}", input.filename, e);
                ExtractionResponse::from_error(&e)
            }
        }
    }
}

/// Try tiers in order over the same text. The first `Ok` wins.
fn run_tiers(
    tiers: &[&Arc<dyn ExtractorTier>],
    raw: &RawText,
) -> Result<(&'static str, TierOutput)> {
    let mut failures = Vec::new();

    for tier in tiers {
        let name = tier.name();
        let outcome = catch_unwind(AssertUnwindSafe(|| tier.extract(raw))).unwrap_or_else(|payload| {
            Err(TierError::Panicked {
                tier: name.to_string(),
                message: panic_message(payload.as_ref()),
            })
        });

        match outcome {
            Ok(output) => {
                debug!("Tier {} succeeded", name);
                return Ok((name, output));
            }
            Err(e) => {
                warn!("Tier {} failed, trying next: {}", name, e);
                failures.push(e.to_string());
            }
        }
    }

    Err(VisuraError::AllTiersFailed(failures.join("; ")))
}
