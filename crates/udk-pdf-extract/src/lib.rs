use std::path::Path;

use udk_core::text_utils::normalize_page_breaks;
use udk_core::{BackendError, PdfBackend, expand_ligatures};

/// Pure-Rust implementation of [`PdfBackend`] built on `pdf-extract`.
///
/// Needs no native library, at the cost of coarser layout handling than
/// MuPDF. Page breaks come back as form feeds and are turned into newlines
/// so both backends produce comparable text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PdfExtractBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        if !path.exists() {
            return Err(BackendError::OpenError(format!(
                "file not found: {}",
                path.display()
            )));
        }

        // pdf-extract panics on some malformed content streams.
        let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text(path)).map_err(|_| {
            BackendError::ExtractionError(format!("pdf-extract panicked on {}", path.display()))
        })?;
        let text = outcome.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("encrypted") || msg.contains("password") {
                BackendError::OpenError(format!("encrypted PDF: {msg}"))
            } else {
                BackendError::ExtractionError(msg)
            }
        })?;

        tracing::debug!(path = %path.display(), chars = text.len(), "pdf-extract extracted text");
        Ok(expand_ligatures(&normalize_page_breaks(&text)))
    }

    fn name(&self) -> &'static str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_open_error() {
        let err = PdfExtractBackend::new()
            .extract_text(Path::new("/nonexistent/definitely-missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }

    #[test]
    fn garbage_file_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = PdfExtractBackend::new().extract_text(&path);
        assert!(result.is_err());
    }
}
