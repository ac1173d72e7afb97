//! Ordered fallback over text backends.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{BackendKind, LopdfBackend, PdfExtractBackend, TextBackend};
use crate::error::{panic_message, BackendError};
use crate::models::config::BackendConfig;
use crate::models::RawText;

#[cfg(feature = "pdftotext")]
use super::PdftotextBackend;

/// Tries each backend in order and returns the first non-empty text.
///
/// Never fails: when every backend fails the result is empty text tagged
/// `"none"`.
pub struct BackendSelector {
    backends: Vec<Arc<dyn TextBackend>>,
}

impl BackendSelector {
    /// Build a chain from an explicit list.
    pub fn new(backends: Vec<Arc<dyn TextBackend>>) -> Self {
        Self { backends }
    }

    /// Build a chain from configured backend names.
    pub fn from_config(config: &BackendConfig) -> Self {
        let mut backends: Vec<Arc<dyn TextBackend>> = Vec::new();

        for name in &config.order {
            match Self::create_backend(name, config) {
                Some(backend) => {
                    debug!("Text backend chain: added {}", backend.kind());
                    backends.push(backend);
                }
                None => warn!("Text backend chain: unknown or disabled backend '{}'", name),
            }
        }

        info!("Text backend chain initialized with {} backends", backends.len());
        Self { backends }
    }

    fn create_backend(name: &str, config: &BackendConfig) -> Option<Arc<dyn TextBackend>> {
        match BackendKind::from_str(name)? {
            #[cfg(feature = "pdftotext")]
            BackendKind::Pdftotext => Some(Arc::new(
                PdftotextBackend::new()
                    .with_binary(config.pdftotext_binary.clone())
                    .with_layout(config.pdftotext_layout),
            )),
            #[cfg(not(feature = "pdftotext"))]
            BackendKind::Pdftotext => {
                let _ = config;
                None
            }
            BackendKind::PdfExtract => Some(Arc::new(PdfExtractBackend::new())),
            BackendKind::Lopdf => Some(Arc::new(LopdfBackend::new())),
        }
    }

    /// Backends in the chain, in order.
    pub fn backends(&self) -> Vec<BackendKind> {
        self.backends.iter().map(|b| b.kind()).collect()
    }

    /// Acquire text from PDF bytes.
    pub fn acquire(&self, data: &[u8]) -> RawText {
        for backend in &self.backends {
            let kind = backend.kind();

            if !backend.is_available() {
                warn!("Text backend {} skipped: dependency missing", kind);
                continue;
            }

            let attempt = catch_unwind(AssertUnwindSafe(|| backend.extract_text(data)))
                .unwrap_or_else(|payload| {
                    Err(BackendError::Panicked(panic_message(payload.as_ref())))
                });

            match attempt {
                Ok(text) if !text.trim().is_empty() => {
                    debug!("Text backend {} produced {} chars", kind, text.len());
                    return RawText::new(text, kind);
                }
                Ok(_) => warn!("Text backend {} failed: {}", kind, BackendError::EmptyOutput),
                Err(e) => warn!("Text backend {} failed: {}", kind, e),
            }
        }

        warn!("All text backends failed, continuing with empty text");
        RawText::empty()
    }
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Result;
    use pretty_assertions::assert_eq;

    /// Backend with scripted behavior.
    enum MockBackend {
        Text(BackendKind, &'static str),
        Fails(BackendKind),
        Panics(BackendKind),
        Unavailable(BackendKind),
    }

    impl TextBackend for MockBackend {
        fn kind(&self) -> BackendKind {
            match self {
                MockBackend::Text(k, _)
                | MockBackend::Fails(k)
                | MockBackend::Panics(k)
                | MockBackend::Unavailable(k) => *k,
            }
        }

        fn is_available(&self) -> bool {
            !matches!(self, MockBackend::Unavailable(_))
        }

        fn extract_text(&self, _data: &[u8]) -> Result<String> {
            match self {
                MockBackend::Text(_, text) => Ok(text.to_string()),
                MockBackend::Fails(_) => Err(BackendError::Parse("corrupt xref".to_string())),
                MockBackend::Panics(_) => panic!("font table overflow"),
                MockBackend::Unavailable(_) => unreachable!("selector must not call"),
            }
        }
    }

    fn chain(backends: Vec<MockBackend>) -> BackendSelector {
        BackendSelector::new(
            backends
                .into_iter()
                .map(|b| Arc::new(b) as Arc<dyn TextBackend>)
                .collect(),
        )
    }

    #[test]
    fn test_first_backend_wins() {
        let selector = chain(vec![
            MockBackend::Text(BackendKind::Pdftotext, "primary"),
            MockBackend::Text(BackendKind::PdfExtract, "secondary"),
        ]);
        assert_eq!(selector.acquire(b"pdf"), RawText::new("primary", BackendKind::Pdftotext));
    }

    #[test]
    fn test_falls_back_on_error_and_panic() {
        let selector = chain(vec![
            MockBackend::Fails(BackendKind::Pdftotext),
            MockBackend::Panics(BackendKind::PdfExtract),
            MockBackend::Text(BackendKind::Lopdf, "third"),
        ]);
        let raw = selector.acquire(b"pdf");
        assert_eq!(raw.text(), "third");
        assert_eq!(raw.backend_used(), "lopdf");
    }

    #[test]
    fn test_whitespace_output_counts_as_failure() {
        let selector = chain(vec![
            MockBackend::Text(BackendKind::Pdftotext, "  \n\t "),
            MockBackend::Text(BackendKind::Lopdf, "real text"),
        ]);
        assert_eq!(selector.acquire(b"pdf").backend(), Some(BackendKind::Lopdf));
    }

    #[test]
    fn test_unavailable_backend_skipped() {
        let selector = chain(vec![
            MockBackend::Unavailable(BackendKind::Pdftotext),
            MockBackend::Text(BackendKind::PdfExtract, "ok"),
        ]);
        assert_eq!(selector.acquire(b"pdf").backend_used(), "pdf-extract");
    }

    #[test]
    fn test_all_fail_yields_none() {
        let selector = chain(vec![
            MockBackend::Fails(BackendKind::Pdftotext),
            MockBackend::Fails(BackendKind::Lopdf),
        ]);
        let raw = selector.acquire(b"pdf");
        assert_eq!(raw, RawText::empty());
        assert_eq!(raw.backend_used(), "none");
    }

    #[test]
    fn test_from_config_skips_unknown_names() {
        let config = BackendConfig {
            order: vec!["ocr".to_string(), "lopdf".to_string()],
            ..BackendConfig::default()
        };
        let selector = BackendSelector::from_config(&config);
        assert_eq!(selector.backends(), vec![BackendKind::Lopdf]);
    }
}
