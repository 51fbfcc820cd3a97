use std::path::Path;

use crate::config::ParsingConfig;
use crate::fields::{self, SegmentFields};
use crate::section;
use crate::{ArticleRecord, FileExtraction, ParsingError, PdfBackend, SegmentStats};

/// A configurable article segmentation pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses the built-in markers; use
/// [`ArticleExtractor::with_config`] to supply custom markers and toggles.
pub struct ArticleExtractor {
    config: ParsingConfig,
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Extract raw text from a PDF file (step 1).
    pub fn extract_text(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<String, ParsingError> {
        Ok(backend.extract_text(path)?)
    }

    /// Split document text into raw segments (step 2).
    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        section::split_segments(text, &self.config)
    }

    /// Derive UDK code, keywords and body from one segment (step 3).
    pub fn parse_segment(&self, segment: &str) -> SegmentFields {
        fields::parse_segment(segment, &self.config)
    }

    /// Run the full pipeline on a PDF file.
    pub fn extract_articles_via_backend(
        &self,
        pdf_path: &Path,
        file_number: u32,
        backend: &dyn PdfBackend,
    ) -> Result<FileExtraction, ParsingError> {
        let text = self.extract_text(pdf_path, backend)?;
        Ok(self.extract_articles_from_text(&text, file_number))
    }

    /// Run the pipeline on already-extracted text.
    pub fn extract_articles_from_text(&self, text: &str, file_number: u32) -> FileExtraction {
        let segments = self.segment(text);

        let mut stats = SegmentStats {
            total_segments: segments.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            if segment.trim().is_empty() {
                stats.empty_segments += 1;
                if self.config.skip_empty_segments {
                    tracing::debug!(segment = i, "skipping empty segment");
                    continue;
                }
            }

            let parsed = self.parse_segment(segment);
            if parsed.keywords.is_some() {
                stats.with_keywords += 1;
            }
            if parsed.literature_trimmed {
                stats.literature_trimmed += 1;
            }
            tracing::debug!(
                segment = i,
                udk = %parsed.udk,
                has_keywords = parsed.keywords.is_some(),
                body_len = parsed.content.len(),
                "parsed segment"
            );

            records.push(ArticleRecord {
                file_number,
                udk: parsed.udk,
                keywords: parsed.keywords,
                content: parsed.content,
            });
        }

        FileExtraction {
            file_number,
            records,
            stats,
        }
    }
}
