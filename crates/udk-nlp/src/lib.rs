//! Lemmatization and sequence preparation over stored article bodies.
//!
//! A small pass: filter and normalize words of a few articles, rank the
//! vocabulary by frequency, map articles to rank sequences and pad them
//! to a common length.

use serde::Serialize;
use thiserror::Error;

pub mod lemma;
pub mod padding;
pub mod tokenizer;

pub use lemma::Lemmatizer;
pub use padding::{PadOptions, Padding, Truncating, pad_sequences};
pub use tokenizer::Tokenizer;

#[derive(Error, Debug)]
pub enum NlpError {
    #[error("maxlen must be at least 1")]
    ZeroMaxlen,
    #[error("expected \"pre\" or \"post\", got {0:?}")]
    InvalidSide(String),
}

/// Settings of one tokenization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NlpConfig {
    /// How many stored bodies to read.
    pub sample_size: usize,
    /// Vocabulary cut-off; ranks `>= num_words` are dropped from sequences.
    pub num_words: Option<usize>,
    pub pad: PadOptions,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            sample_size: 5,
            num_words: Some(5),
            pad: PadOptions {
                maxlen: Some(6),
                padding: Padding::Post,
                truncating: Truncating::Pre,
                value: 0,
            },
        }
    }
}

/// Everything a pass produces, in the order it is printed.
#[derive(Debug, Clone, Serialize)]
pub struct TokenizationReport {
    pub lemmas: Vec<Vec<String>>,
    pub sequences: Vec<Vec<usize>>,
    pub padded_sequences: Vec<Vec<usize>>,
    pub word_index: Vec<(String, usize)>,
}

/// Lemmatize `contents`, fit a tokenizer on them and build padded sequences.
pub fn run_pass<S: AsRef<str>>(
    contents: &[S],
    config: &NlpConfig,
) -> Result<TokenizationReport, NlpError> {
    let lemmatizer = Lemmatizer::new();
    let lemmas: Vec<Vec<String>> = contents
        .iter()
        .map(|c| lemmatizer.lemmatize(c.as_ref()))
        .collect();

    let mut tokenizer = Tokenizer::new(config.num_words);
    tokenizer.fit_on_token_lists(&lemmas);

    let sequences = tokenizer.texts_to_sequences(&lemmas);
    let padded_sequences = pad_sequences(&sequences, &config.pad)?;

    tracing::info!(
        documents = lemmas.len(),
        vocabulary = tokenizer.word_index().len(),
        "tokenization pass complete"
    );

    Ok(TokenizationReport {
        lemmas,
        sequences,
        padded_sequences,
        word_index: tokenizer.word_index(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLES: [&str; 3] = [
        "Нейронные сети применяются для классификации изображений. Сети обучаются на данных.",
        "Классификация текстов с помощью нейронных сетей и deep learning.",
        "Данные собираются, данные очищаются, данные размечаются.",
    ];

    #[test]
    fn default_pass_shapes() {
        let report = run_pass(&ARTICLES, &NlpConfig::default()).unwrap();

        assert_eq!(report.lemmas.len(), 3);
        assert_eq!(report.sequences.len(), 3);
        assert!(report.padded_sequences.iter().all(|s| s.len() == 6));
        // num_words = 5 keeps ranks 1..=4
        assert!(report.sequences.iter().flatten().all(|&i| (1..5).contains(&i)));
        assert!(report.lemmas.iter().flatten().all(|l| l != "deep" && l != "learning"));
    }

    #[test]
    fn most_frequent_lemma_ranks_first() {
        let report = run_pass(&ARTICLES, &NlpConfig::default()).unwrap();
        let (top, rank) = &report.word_index[0];
        assert_eq!(*rank, 1);
        // "данные" x3 plus "данных" x1
        assert_eq!(Some(top.clone()), Lemmatizer::new().lemma("данные"));
        assert_eq!(Lemmatizer::new().lemma("данных"), Lemmatizer::new().lemma("данные"));
    }

    #[test]
    fn unlimited_vocabulary_and_padding() {
        let config = NlpConfig {
            sample_size: 3,
            num_words: None,
            pad: PadOptions::default(),
        };
        let report = run_pass(&ARTICLES, &config).unwrap();
        let longest = report.sequences.iter().map(Vec::len).max().unwrap();
        assert!(report.padded_sequences.iter().all(|s| s.len() == longest));
        assert_eq!(
            report.sequences.iter().map(Vec::len).collect::<Vec<_>>(),
            report.lemmas.iter().map(Vec::len).collect::<Vec<_>>()
        );
    }

    #[test]
    fn report_serializes() {
        let report = run_pass(&ARTICLES[..1], &NlpConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["word_index"].is_array());
        assert!(json["padded_sequences"][0].is_array());
    }
}
