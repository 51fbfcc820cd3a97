use std::collections::HashSet;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

/// Russian function words dropped before normalization.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "а", "без", "более", "бы", "был", "была", "были", "было", "быть", "в", "вам", "вас",
        "весь", "во", "вот", "все", "всего", "всех", "вы", "где", "да", "даже", "для", "до",
        "его", "ее", "её", "ей", "ему", "если", "есть", "еще", "ещё", "же", "за", "здесь", "и",
        "из", "или", "им", "их", "к", "как", "какой", "когда", "кто", "ли", "либо", "между",
        "меня", "мне", "может", "мы", "на", "над", "надо", "наш", "не", "него", "нее", "неё",
        "нет", "ни", "них", "но", "ну", "о", "об", "однако", "он", "она", "они", "оно", "от",
        "очень", "по", "под", "при", "про", "с", "со", "так", "также", "такой", "там", "те",
        "тем", "то", "того", "тоже", "той", "только", "том", "ты", "у", "уже", "хотя", "чего",
        "чей", "чем", "что", "чтобы", "эта", "эти", "это", "этого", "этой", "этом", "этот", "я",
        "являются", "является", "которые", "который", "которая", "которое", "своей",
        "свой", "свои", "себя", "сам", "сама", "само", "сами", "через", "после", "перед", "около",
        "другие", "другой", "каждый", "можно", "нужно", "один", "одна", "одно",
    ]
    .into_iter()
    .collect()
});

/// Filters and normalizes words of Russian text.
///
/// A word is dropped when it is a stop word, or when it consists solely of
/// ASCII Latin letters (English fragments in otherwise Russian articles).
/// Remaining words are lowercased and reduced to their Snowball stem, which
/// stands in for dictionary lemmatization.
pub struct Lemmatizer {
    stemmer: Stemmer,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::Russian),
        }
    }

    /// Normalize a single word; `None` if it is filtered out.
    pub fn lemma(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        if lower.trim().is_empty()
            || STOP_WORDS.contains(lower.as_str())
            || is_latin_word(&lower)
        {
            return None;
        }
        let folded = lower.replace('ё', "е");
        Some(self.stemmer.stem(&folded).into_owned())
    }

    /// Normalize every kept word of `text`, in order.
    pub fn lemmatize(&self, text: &str) -> Vec<String> {
        text.unicode_words().filter_map(|w| self.lemma(w)).collect()
    }
}

fn is_latin_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}
