//! Field extraction: rules, confidence scoring, tiers and the pipeline.

pub mod confidence;
mod orchestrator;
pub mod rules;
pub mod tiers;

pub use orchestrator::VisuraExtractor;
pub use tiers::{create_tier, tiers_from_names, ExtractorTier, StrictTier, TierOutput};
#[cfg(feature = "full-tier")]
pub use tiers::FullTier;
