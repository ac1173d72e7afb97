//! In-process text backends built on lopdf and pdf-extract.

use std::borrow::Cow;

use lopdf::Document;
use tracing::{debug, trace};

use super::{BackendKind, Result, TextBackend};
use crate::error::BackendError;

/// Parse a PDF, decrypting it when it only carries an empty user password.
///
/// Returns the document and the bytes downstream parsers should read: the
/// original buffer, or a re-serialized copy when decryption happened.
pub fn load_document(data: &[u8]) -> Result<(Document, Cow<'_, [u8]>)> {
    let mut doc = Document::load_mem(data).map_err(|e| BackendError::Parse(e.to_string()))?;

    let bytes = if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(BackendError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| BackendError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Cow::Owned(decrypted)
    } else {
        Cow::Borrowed(data)
    };

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(BackendError::NoPages);
    }

    trace!("Loaded PDF with {} pages", page_count);
    Ok((doc, bytes))
}

/// Text backend using the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for PdfExtractBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PdfExtract
    }

    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let (_, bytes) = load_document(data)?;
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| BackendError::TextExtraction(e.to_string()))
    }
}

/// Text backend using lopdf's per-page content stream decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for LopdfBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Lopdf
    }

    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let (doc, _) = load_document(data)?;

        let mut text = String::new();
        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(e) => {
                    debug!("lopdf could not read page {}: {}", page_num, e);
                }
            }
        }

        if text.trim().is_empty() {
            return Err(BackendError::TextExtraction(
                "no decodable text on any page".to_string(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_garbage() {
        let err = load_document(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn test_backends_fail_on_garbage() {
        assert!(PdfExtractBackend::new().extract_text(b"%PDF-1.4 broken").is_err());
        assert!(LopdfBackend::new().extract_text(b"%PDF-1.4 broken").is_err());
    }

    #[test]
    fn test_backend_kinds() {
        assert_eq!(PdfExtractBackend::new().kind(), BackendKind::PdfExtract);
        assert_eq!(LopdfBackend::new().kind(), BackendKind::Lopdf);
        assert!(LopdfBackend::new().is_available());
    }
}
