use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

pub mod folder;

// Re-export domain types for convenience
pub use udk_core::{ArticleRecord, FileExtraction, PdfBackend, SegmentStats};
pub use folder::{
    FileReport, FolderReport, IngestOptions, IngestProgress, extract_to_text_file, ingest_file,
    ingest_folder, list_pdfs, split_text_file, text_output_path,
};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF extraction error: {0}")]
    Backend(#[from] udk_core::BackendError),
    #[error("parsing error: {0}")]
    Parsing(#[from] udk_parsing::ParsingError),
    #[error("database error: {0}")]
    Store(#[from] udk_core::StoreError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("unknown backend {0:?} (expected \"mupdf\" or \"pdf-extract\")")]
    UnknownBackend(String),
    #[cfg(not(feature = "mupdf"))]
    #[error("MuPDF support not compiled in (enable the `mupdf` feature of udk-ingest)")]
    NoMupdfSupport,
}

impl IngestError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Which PDF text extractor to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Mupdf,
    PdfExtract,
}

impl FromStr for BackendKind {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mupdf" => Ok(Self::Mupdf),
            "pdf-extract" | "pdf_extract" | "pdfextract" => Ok(Self::PdfExtract),
            other => Err(IngestError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mupdf => "mupdf",
            Self::PdfExtract => "pdf-extract",
        })
    }
}

/// Backend selection plus backend-specific knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackendOptions {
    pub kind: BackendKind,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

/// Build the configured backend.
pub fn make_backend(opts: &BackendOptions) -> Result<Box<dyn PdfBackend>, IngestError> {
    match opts.kind {
        BackendKind::Mupdf => mupdf_backend(opts),
        BackendKind::PdfExtract => Ok(Box::new(udk_pdf_extract::PdfExtractBackend::new())),
    }
}

#[cfg(feature = "mupdf")]
fn mupdf_backend(opts: &BackendOptions) -> Result<Box<dyn PdfBackend>, IngestError> {
    let mut backend = udk_pdf_mupdf::MupdfBackend::new();
    if let Some(ratio) = opts.header_exclusion {
        backend = backend.with_header_exclusion(ratio);
    }
    if let Some(ratio) = opts.footer_exclusion {
        backend = backend.with_footer_exclusion(ratio);
    }
    Ok(Box::new(backend))
}

#[cfg(not(feature = "mupdf"))]
fn mupdf_backend(_opts: &BackendOptions) -> Result<Box<dyn PdfBackend>, IngestError> {
    Err(IngestError::NoMupdfSupport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parse_and_display() {
        assert_eq!("MuPDF".parse::<BackendKind>().unwrap(), BackendKind::Mupdf);
        assert_eq!(
            "pdf-extract".parse::<BackendKind>().unwrap(),
            BackendKind::PdfExtract
        );
        assert!("pypdf2".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::PdfExtract.to_string(), "pdf-extract");
    }

    #[test]
    fn make_pdf_extract_backend() {
        let backend = make_backend(&BackendOptions {
            kind: BackendKind::PdfExtract,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.name(), "pdf-extract");
    }

    #[cfg(feature = "mupdf")]
    #[test]
    fn make_mupdf_backend() {
        let backend = make_backend(&BackendOptions::default()).unwrap();
        assert_eq!(backend.name(), "mupdf");
    }
}
