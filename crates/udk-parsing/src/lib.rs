use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod fields;
pub mod section;

pub use config::{ConfigError, ParsingConfig, ParsingConfigBuilder};
pub use extractor::ArticleExtractor;
// Re-export domain types from core (canonical definitions live there)
pub use udk_core::{ArticleRecord, BackendError, FileExtraction, PdfBackend, SegmentStats};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid parsing config: {0}")]
    Config(#[from] ConfigError),
    #[error("backend error: {0}")]
    Backend(#[from] udk_core::BackendError),
}
