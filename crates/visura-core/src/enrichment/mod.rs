//! Activity-code enrichment.
//!
//! Enrichment is a read-only lookup that decorates a validated codice ATECO
//! with a description, a sector and that sector's regulations and
//! certifications. It never influences field validity or confidence.

mod cache;
mod sectors;

pub use cache::CachedEnricher;
pub use sectors::{SectorEnricher, SectorMapping, SectorRule};

use serde::{Deserialize, Serialize};

/// Sector reported for codes with no matching prefix.
pub const UNMAPPED_SECTOR: &str = "non mappato";

/// Enrichment attached to a validated codice ATECO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtecoDetails {
    pub codice: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub descrizione: Option<String>,

    pub settore: String,

    #[serde(default)]
    pub normative: Vec<String>,

    #[serde(default)]
    pub certificazioni: Vec<String>,
}

/// Lookup service for codice ATECO enrichment.
pub trait AtecoEnricher: Send + Sync {
    /// Enrich a validated code. `None` when the code cannot be enriched.
    fn enrich(&self, code: &str) -> Option<AtecoDetails>;
}
