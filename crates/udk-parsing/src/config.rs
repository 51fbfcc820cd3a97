use regex::Regex;
use thiserror::Error;

/// Marker that starts every article.
pub const DEFAULT_SEGMENT_MARKER: &str = "УДК ";
/// Marker that introduces the keyword list.
pub const DEFAULT_KEYWORDS_MARKER: &str = "Ключевые слова:";
/// Marker of the bibliography trailer (matched case-insensitively).
pub const DEFAULT_LITERATURE_MARKER: &str = "литература";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} marker must not be empty")]
    EmptyMarker(&'static str),
    #[error("invalid literature marker: {0}")]
    Regex(#[from] regex::Error),
}

/// Configuration for the article segmentation pipeline.
///
/// `literature_re` is `None` when the built-in marker is used.
/// Use [`ParsingConfigBuilder`] to construct with custom markers.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    pub(crate) segment_marker: String,
    pub(crate) keywords_marker: String,
    pub(crate) literature_marker: String,
    pub(crate) literature_re: Option<Regex>,
    pub(crate) extract_keywords: bool,
    pub(crate) trim_literature: bool,
    pub(crate) strip_page_numbers: bool,
    pub(crate) skip_empty_segments: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            segment_marker: DEFAULT_SEGMENT_MARKER.to_string(),
            keywords_marker: DEFAULT_KEYWORDS_MARKER.to_string(),
            literature_marker: DEFAULT_LITERATURE_MARKER.to_string(),
            literature_re: None,
            extract_keywords: true,
            trim_literature: true,
            strip_page_numbers: true,
            skip_empty_segments: false,
        }
    }
}

impl ParsingConfig {
    pub fn segment_marker(&self) -> &str {
        &self.segment_marker
    }

    pub fn keywords_marker(&self) -> &str {
        &self.keywords_marker
    }

    pub fn literature_marker(&self) -> &str {
        &self.literature_marker
    }

    pub fn extract_keywords(&self) -> bool {
        self.extract_keywords
    }

    pub fn trim_literature(&self) -> bool {
        self.trim_literature
    }

    pub fn skip_empty_segments(&self) -> bool {
        self.skip_empty_segments
    }
}

/// Builder for [`ParsingConfig`].
///
/// Fails in [`build()`](Self::build) if a marker is empty.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    segment_marker: Option<String>,
    keywords_marker: Option<String>,
    literature_marker: Option<String>,
    extract_keywords: Option<bool>,
    trim_literature: Option<bool>,
    strip_page_numbers: Option<bool>,
    skip_empty_segments: Option<bool>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Markers ──

    pub fn segment_marker(mut self, marker: &str) -> Self {
        self.segment_marker = Some(marker.to_string());
        self
    }

    pub fn keywords_marker(mut self, marker: &str) -> Self {
        self.keywords_marker = Some(marker.to_string());
        self
    }

    pub fn literature_marker(mut self, marker: &str) -> Self {
        self.literature_marker = Some(marker.to_string());
        self
    }

    // ── Toggles ──

    pub fn extract_keywords(mut self, on: bool) -> Self {
        self.extract_keywords = Some(on);
        self
    }

    pub fn trim_literature(mut self, on: bool) -> Self {
        self.trim_literature = Some(on);
        self
    }

    pub fn strip_page_numbers(mut self, on: bool) -> Self {
        self.strip_page_numbers = Some(on);
        self
    }

    pub fn skip_empty_segments(mut self, on: bool) -> Self {
        self.skip_empty_segments = Some(on);
        self
    }

    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        let defaults = ParsingConfig::default();

        let segment_marker = non_empty(self.segment_marker, "segment")?;
        let keywords_marker = non_empty(self.keywords_marker, "keywords")?;
        let literature_marker = non_empty(self.literature_marker, "literature")?;

        let literature_re = literature_marker
            .as_deref()
            .map(|m| Regex::new(&format!("(?i){}", regex::escape(m))))
            .transpose()?;

        Ok(ParsingConfig {
            segment_marker: segment_marker.unwrap_or(defaults.segment_marker),
            keywords_marker: keywords_marker.unwrap_or(defaults.keywords_marker),
            literature_marker: literature_marker.unwrap_or(defaults.literature_marker),
            literature_re,
            extract_keywords: self.extract_keywords.unwrap_or(defaults.extract_keywords),
            trim_literature: self.trim_literature.unwrap_or(defaults.trim_literature),
            strip_page_numbers: self
                .strip_page_numbers
                .unwrap_or(defaults.strip_page_numbers),
            skip_empty_segments: self
                .skip_empty_segments
                .unwrap_or(defaults.skip_empty_segments),
        })
    }
}

fn non_empty(marker: Option<String>, which: &'static str) -> Result<Option<String>, ConfigError> {
    match marker {
        Some(m) if m.is_empty() => Err(ConfigError::EmptyMarker(which)),
        other => Ok(other),
    }
}
