//! Error types for the visura-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the visura library.
#[derive(Error, Debug)]
pub enum VisuraError {
    /// Input rejected before any text acquisition.
    #[error("input rejected: {0}")]
    Input(#[from] InputError),

    /// Text backend error.
    #[error("text backend error: {0}")]
    Backend(#[from] BackendError),

    /// Extractor tier error.
    #[error("tier error: {0}")]
    Tier(#[from] TierError),

    /// No extractor tier is compiled in or configured.
    #[error("no extractor tier available: {0}")]
    NoTierAvailable(String),

    /// Every configured tier failed.
    #[error("all extractor tiers failed: {0}")]
    AllTiersFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl VisuraError {
    /// Caller-visible error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            VisuraError::Input(e) => e.code(),
            VisuraError::NoTierAvailable(_) => ErrorCode::ModuleNotAvailable,
            _ => ErrorCode::ExtractionError,
        }
    }
}

/// Out-of-contract input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Declared content type is not accepted.
    #[error("unsupported content type '{0}', expected application/pdf")]
    InvalidFileType(String),

    /// Declared size is above the configured maximum.
    #[error("file size {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// Declared size is zero or the buffer is empty.
    #[error("file is empty")]
    EmptyFile,
}

impl InputError {
    pub fn code(&self) -> ErrorCode {
        match self {
            InputError::InvalidFileType(_) => ErrorCode::InvalidFileType,
            InputError::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            InputError::EmptyFile => ErrorCode::EmptyFile,
        }
    }
}

/// A single text backend failing.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Failed to open/parse the PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The backend's external dependency is missing.
    #[error("backend not available: {0}")]
    NotAvailable(String),

    /// The backend produced only whitespace.
    #[error("backend returned no text")]
    EmptyOutput,

    /// The backend panicked.
    #[error("backend panicked: {0}")]
    Panicked(String),

    /// I/O error (temporary files, subprocess pipes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single extractor tier failing.
#[derive(Error, Debug)]
pub enum TierError {
    /// The tier is not compiled in or its dependencies are missing.
    #[error("tier '{0}' is not available")]
    NotAvailable(String),

    /// The tier returned an error.
    #[error("tier '{tier}' failed: {reason}")]
    Failed { tier: String, reason: String },

    /// The tier panicked.
    #[error("tier '{tier}' panicked: {message}")]
    Panicked { tier: String, message: String },
}

/// Wire-level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidFileType,
    FileTooLarge,
    EmptyFile,
    ModuleNotAvailable,
    ExtractionError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::EmptyFile => "EMPTY_FILE",
            ErrorCode::ModuleNotAvailable => "MODULE_NOT_AVAILABLE",
            ErrorCode::ExtractionError => "EXTRACTION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a caught panic payload as a message.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Result type for the visura library.
pub type Result<T> = std::result::Result<T, VisuraError>;
