pub mod backend;
pub mod config_file;
pub mod store;
pub mod text_utils;

pub use backend::{BackendError, PdfBackend};
pub use store::{ArticleStore, StoreError, StoredRecord};
pub use text_utils::expand_ligatures;

/// One article cut out of a PDF at a UDK marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// 1-based sequence number of the source file within its batch.
    pub file_number: u32,
    /// Classification code: the first line of the segment, trimmed.
    pub udk: String,
    /// Text between the keywords marker and the next period, if present.
    pub keywords: Option<String>,
    /// Body with the UDK line, keyword prefix and literature trailer removed.
    pub content: String,
}

/// Statistics collected while segmenting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub total_segments: usize,
    pub empty_segments: usize,
    pub with_keywords: usize,
    pub literature_trimmed: usize,
}

/// Result of segmenting one document.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub file_number: u32,
    pub records: Vec<ArticleRecord>,
    pub stats: SegmentStats,
}
