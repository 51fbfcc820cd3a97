use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NlpError;

/// Which end receives filler values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    #[default]
    Pre,
    Post,
}

/// Which end loses values when a sequence is longer than `maxlen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncating {
    #[default]
    Pre,
    Post,
}

impl FromStr for Padding {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" => Ok(Self::Pre),
            "post" => Ok(Self::Post),
            other => Err(NlpError::InvalidSide(other.to_string())),
        }
    }
}

impl FromStr for Truncating {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" => Ok(Self::Pre),
            "post" => Ok(Self::Post),
            other => Err(NlpError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pre => "pre",
            Self::Post => "post",
        })
    }
}

/// Options for [`pad_sequences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PadOptions {
    /// Target length; `None` pads to the longest sequence.
    pub maxlen: Option<usize>,
    pub padding: Padding,
    pub truncating: Truncating,
    pub value: usize,
}

/// Bring every sequence to the same length.
pub fn pad_sequences(sequences: &[Vec<usize>], opts: &PadOptions) -> Result<Vec<Vec<usize>>, NlpError> {
    if opts.maxlen == Some(0) {
        return Err(NlpError::ZeroMaxlen);
    }
    let maxlen = opts
        .maxlen
        .unwrap_or_else(|| sequences.iter().map(Vec::len).max().unwrap_or(0));

    Ok(sequences
        .iter()
        .map(|seq| -> Vec<usize> {
            let kept: &[usize] = if seq.len() > maxlen {
                match opts.truncating {
                    Truncating::Pre => &seq[seq.len() - maxlen..],
                    Truncating::Post => &seq[..maxlen],
                }
            } else {
                seq
            };
            let fill = std::iter::repeat_n(opts.value, maxlen - kept.len());
            match opts.padding {
                Padding::Pre => fill.chain(kept.iter().copied()).collect(),
                Padding::Post => kept.iter().copied().chain(fill).collect(),
            }
        })
        .collect())
}
