use std::path::Path;

use mupdf::{Document, Page, TextPageFlags};

use udk_core::{BackendError, PdfBackend, expand_ligatures};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the mupdf dependency (AGPL-3.0) so that the
/// pure-Rust code paths do not transitively depend on it.
///
/// Pages are concatenated in full by default. Running headers and footers
/// (journal title, page numbers) can be dropped by setting exclusion ratios;
/// they otherwise end up inside article bodies when an article spans pages.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// The band of a page spanning `top..bottom` whose blocks are kept.
    fn body_band(&self, top: f32, bottom: f32) -> BodyBand {
        let height = bottom - top;
        BodyBand {
            header_edge: self.header_exclusion_ratio.map(|r| top + height * r),
            footer_edge: self.footer_exclusion_ratio.map(|r| bottom - height * r),
        }
    }

    fn page_text(&self, page: &Page) -> Result<String, BackendError> {
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(extraction_error)?;
        let bounds = page.bounds().map_err(extraction_error)?;
        let band = self.body_band(bounds.y0, bounds.y1);

        let mut text = String::new();
        for block in text_page.blocks() {
            let rect = block.bounds();
            if !band.keeps(rect.y0, rect.y1) {
                continue;
            }
            for line in block.lines() {
                text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                text.push('\n');
            }
        }
        Ok(text)
    }
}

/// Page area between the running head and the folio line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BodyBand {
    header_edge: Option<f32>,
    footer_edge: Option<f32>,
}

impl BodyBand {
    /// A block is dropped when it ends above the header edge or starts below
    /// the footer edge. Blocks straddling an edge are body text.
    fn keeps(&self, block_top: f32, block_bottom: f32) -> bool {
        self.header_edge.is_none_or(|edge| block_bottom > edge)
            && self.footer_edge.is_none_or(|edge| block_top < edge)
    }
}

fn extraction_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();
        for page in document.pages().map_err(extraction_error)? {
            let page = page.map_err(extraction_error)?;
            pages_text.push(self.page_text(&page)?);
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "mupdf extracted text");
        Ok(expand_ligatures(&pages_text.join("\n")))
    }

    fn name(&self) -> &'static str {
        "mupdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_page_kept_by_default() {
        let band = MupdfBackend::new().body_band(0.0, 800.0);
        assert_eq!(
            band,
            BodyBand {
                header_edge: None,
                footer_edge: None,
            }
        );
        assert!(band.keeps(0.0, 10.0));
        assert!(band.keeps(790.0, 800.0));
    }

    #[test]
    fn running_head_and_folio_are_dropped() {
        let band = MupdfBackend::new()
            .with_header_exclusion(0.05)
            .with_footer_exclusion(0.05)
            .body_band(0.0, 800.0);
        // edges near y = 40 and y = 760
        assert!(!band.keeps(10.0, 30.0));
        assert!(!band.keeps(770.0, 785.0));
        assert!(band.keeps(30.0, 120.0));
        assert!(band.keeps(700.0, 765.0));
        assert!(band.keeps(100.0, 700.0));
    }

    #[test]
    fn zero_ratio_disables_exclusion() {
        let band = MupdfBackend::new()
            .with_header_exclusion(0.04)
            .with_footer_exclusion(0.05)
            .with_header_exclusion(0.0)
            .body_band(0.0, 1000.0);
        assert_eq!(band.header_edge, None);
        let footer = band.footer_edge.unwrap();
        assert!((footer - 950.0).abs() < 1e-3);
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_text(Path::new("/nonexistent/definitely-missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }
}
