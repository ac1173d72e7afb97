//! Core library for Italian company registry extract (visura camerale) processing.
//!
//! This crate provides:
//! - PDF text acquisition with ordered backend fallback (pdftotext, pdf-extract, lopdf)
//! - Rule-based extraction of Partita IVA, codice ATECO and oggetto sociale
//! - Field validation and discrete confidence scoring
//! - Extractor tier fallback and codice ATECO sector enrichment

pub mod enrichment;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;

pub use enrichment::{AtecoDetails, AtecoEnricher, CachedEnricher, SectorEnricher};
pub use error::{ErrorCode, InputError, Result, VisuraError};
pub use extraction::{ExtractorTier, StrictTier, VisuraExtractor};
#[cfg(feature = "full-tier")]
pub use extraction::FullTier;
pub use models::{
    ConfidenceScore, ExtractionInput, ExtractionResponse, ExtractionResult, Field, RawText,
    ValidatedField, VisuraConfig,
};
pub use pdf::{BackendKind, BackendSelector, TextBackend};
