//! Data models and configuration.

pub mod config;
pub mod visura;

pub use config::VisuraConfig;
pub use visura::{
    ConfidenceScore, DetailStatus, ErrorBody, ExtractionInput, ExtractionMetadata,
    ExtractionResponse, ExtractionResult, Field, FieldCandidate, FieldOutcome, FieldStatus,
    RawText, RegistryDetails, SedeLegale, ValidatedField, VisuraData,
};
