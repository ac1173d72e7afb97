//! PDF text acquisition.
//!
//! Several [`TextBackend`] implementations turn PDF bytes into plain text.
//! [`BackendSelector`] tries them in order and keeps the first usable output.

mod extractor;
#[cfg(feature = "pdftotext")]
mod pdftotext;
mod selector;

pub use extractor::{load_document, LopdfBackend, PdfExtractBackend};
#[cfg(feature = "pdftotext")]
pub use pdftotext::PdftotextBackend;
pub use selector::BackendSelector;

use crate::error::BackendError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Known text backends, highest fidelity first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Poppler `pdftotext` subprocess.
    Pdftotext,
    /// `pdf-extract` crate.
    PdfExtract,
    /// `lopdf` page text.
    Lopdf,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Pdftotext => "pdftotext",
            BackendKind::PdfExtract => "pdf-extract",
            BackendKind::Lopdf => "lopdf",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdftotext" | "poppler" => Some(BackendKind::Pdftotext),
            "pdf-extract" | "pdf_extract" => Some(BackendKind::PdfExtract),
            "lopdf" => Some(BackendKind::Lopdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that produces text from PDF bytes or fails explicitly.
pub trait TextBackend: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Whether the backend's dependencies are present.
    fn is_available(&self) -> bool {
        true
    }

    /// Extract plain text from the whole document.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_names() {
        for kind in [BackendKind::Pdftotext, BackendKind::PdfExtract, BackendKind::Lopdf] {
            assert_eq!(BackendKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(BackendKind::from_str("poppler"), Some(BackendKind::Pdftotext));
        assert_eq!(BackendKind::from_str("tesseract"), None);
    }
}
