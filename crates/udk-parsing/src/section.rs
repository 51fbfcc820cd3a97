use crate::config::ParsingConfig;

/// Split document text at every occurrence of the literal `marker`.
///
/// The segment before the first marker is kept (possibly empty), so
/// `segments.join(marker)` always reproduces `text`. Text without the marker
/// comes back as a single segment.
pub fn split_on_marker<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    if marker.is_empty() {
        return vec![text];
    }
    text.split(marker).collect()
}

/// Split using the segment marker from `config`.
pub fn split_segments<'a>(text: &'a str, config: &ParsingConfig) -> Vec<&'a str> {
    split_on_marker(text, config.segment_marker())
}
