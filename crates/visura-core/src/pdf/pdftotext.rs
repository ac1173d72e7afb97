//! Poppler `pdftotext` subprocess backend.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use super::{BackendKind, Result, TextBackend};
use crate::error::BackendError;

/// Runs `pdftotext` over a temporary copy of the input.
#[derive(Debug, Clone)]
pub struct PdftotextBackend {
    binary: String,
    layout: bool,
    temp_dir: Option<PathBuf>,
}

impl PdftotextBackend {
    /// Use `pdftotext` from `PATH` in layout mode.
    pub fn new() -> Self {
        Self {
            binary: "pdftotext".to_string(),
            layout: true,
            temp_dir: None,
        }
    }

    /// Set the binary name or path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set whether to pass `-layout`.
    pub fn with_layout(mut self, layout: bool) -> Self {
        self.layout = layout;
        self
    }

    /// Create the temporary input copy in `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBackend for PdftotextBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pdftotext
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    fn extract_text(&self, data: &[u8]) -> Result<String> {
        // Removed when `input` drops, on every return path below.
        let mut builder = tempfile::Builder::new();
        builder.prefix("visura-").suffix(".pdf");
        let mut input = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        input.write_all(data)?;
        input.flush()?;

        let mut cmd = Command::new(&self.binary);
        if self.layout {
            cmd.arg("-layout");
        }
        cmd.args(["-enc", "UTF-8", "-q"]).arg(input.path()).arg("-");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackendError::NotAvailable(format!(
                    "{} not found. Install poppler-utils",
                    self.binary
                )));
            }
            Err(e) => return Err(BackendError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::TextExtraction(format!(
                "pdftotext exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("pdftotext produced {} chars", text.len());
        Ok(text)
    }
}
