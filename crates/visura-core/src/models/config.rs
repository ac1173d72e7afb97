//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default maximum accepted upload size (20 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Main configuration for the visura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisuraConfig {
    /// Input gate configuration.
    pub input: InputConfig,

    /// Text backend configuration.
    pub backends: BackendConfig,

    /// Extractor tier configuration.
    pub extraction: ExtractionConfig,

    /// Activity-code enrichment configuration.
    pub enrichment: EnrichmentConfig,
}

/// Limits checked before any text acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum declared size in bytes.
    pub max_file_size: u64,

    /// Accepted declared content types.
    pub accepted_content_types: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_content_types: vec!["application/pdf".to_string()],
        }
    }
}

/// Text backend chain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend names, tried in order.
    pub order: Vec<String>,

    /// Path or name of the poppler `pdftotext` binary.
    pub pdftotext_binary: String,

    /// Run `pdftotext` with `-layout`.
    pub pdftotext_layout: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            order: vec![
                "pdftotext".to_string(),
                "pdf-extract".to_string(),
                "lopdf".to_string(),
            ],
            pdftotext_binary: "pdftotext".to_string(),
            pdftotext_layout: true,
        }
    }
}

/// Extractor tier chain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tier names, highest fidelity first.
    pub tiers: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tiers: vec!["full".to_string(), "strict".to_string()],
        }
    }
}

/// Activity-code enrichment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Attach `ateco_details` to successful results.
    pub enabled: bool,

    /// Maximum number of cached lookups.
    pub cache_capacity: usize,

    /// Optional JSON sector mapping replacing the built-in one.
    pub mapping_file: Option<PathBuf>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_capacity: 256,
            mapping_file: None,
        }
    }
}

impl VisuraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
