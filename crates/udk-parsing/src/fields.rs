//! Field extraction from a single UDK segment.
//!
//! All operations are literal string searches and slices; none of them
//! allocate except where trimming requires an owned result upstream.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

static LITERATURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)литература").unwrap());

/// The classification code: first line of the segment, trimmed.
pub fn extract_udk(segment: &str) -> &str {
    segment.split('\n').next().unwrap_or("").trim()
}

/// Everything after the UDK line, trimmed, with leading page digits removed.
pub fn strip_udk_prefix(segment: &str, strip_page_numbers: bool) -> &str {
    let rest = match segment.find('\n') {
        Some(i) => &segment[i + 1..],
        None => "",
    };
    let rest = rest.trim();
    if strip_page_numbers {
        rest.trim_start_matches(|c: char| c.is_ascii_digit()).trim()
    } else {
        rest
    }
}

/// Text after the first `marker` up to the next period, trimmed.
///
/// Returns `None` when the marker is absent or the span is blank.
pub fn extract_keywords<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let span = text[start..].split('.').next().unwrap_or("").trim();
    (!span.is_empty()).then_some(span)
}

/// Cut the text at the first literature marker (case-insensitive).
///
/// Returns the trimmed head and whether a cut happened.
pub fn remove_literature_and_after<'a>(text: &'a str, literature: &Regex) -> (&'a str, bool) {
    match literature.find(text) {
        Some(m) => (text[..m.start()].trim(), true),
        None => (text, false),
    }
}

/// Drop everything up to and including the keyword span and its period.
///
/// Text without a (non-blank) keyword span is returned unchanged.
pub fn remove_keywords_and_before<'a>(text: &'a str, marker: &str) -> &'a str {
    if extract_keywords(text, marker).is_none() {
        return text;
    }
    let Some(start) = text.find(marker) else {
        return text;
    };
    let after = &text[start + marker.len()..];
    match after.find('.') {
        Some(dot) => after[dot + 1..].trim(),
        None => "",
    }
}

/// Fields of one parsed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFields {
    pub udk: String,
    pub keywords: Option<String>,
    pub content: String,
    pub literature_trimmed: bool,
}

/// Run the whole field extraction on one segment.
///
/// Keywords come from the untouched segment; the body is built by stripping
/// the UDK line, then the literature trailer, then the keyword prefix.
pub fn parse_segment(segment: &str, config: &ParsingConfig) -> SegmentFields {
    let udk = extract_udk(segment);
    let keywords = if config.extract_keywords {
        extract_keywords(segment, &config.keywords_marker)
    } else {
        None
    };

    let mut body = strip_udk_prefix(segment, config.strip_page_numbers);

    let mut literature_trimmed = false;
    if config.trim_literature {
        let re = config.literature_re.as_ref().unwrap_or(&LITERATURE_RE);
        let (head, cut) = remove_literature_and_after(body, re);
        body = head;
        literature_trimmed = cut;
    }

    if config.extract_keywords {
        body = remove_keywords_and_before(body, &config.keywords_marker);
    }

    SegmentFields {
        udk: udk.to_string(),
        keywords: keywords.map(str::to_string),
        content: body.to_string(),
        literature_trimmed,
    }
}
