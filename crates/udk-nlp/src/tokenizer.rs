use std::collections::HashMap;

/// Frequency-ranked vocabulary in the style of the Keras text tokenizer.
///
/// Words are ranked by descending count, ties keeping first-seen order;
/// ranks start at 1 so that 0 stays free for padding. With `num_words = n`
/// only ranks `1..n` survive [`texts_to_sequences`](Self::texts_to_sequences).
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    num_words: Option<usize>,
    counts: HashMap<String, usize>,
    first_seen: Vec<String>,
    word_index: HashMap<String, usize>,
}

impl Tokenizer {
    pub fn new(num_words: Option<usize>) -> Self {
        Self {
            num_words,
            ..Default::default()
        }
    }

    /// Update counts from pre-tokenized documents and rebuild the index.
    pub fn fit_on_token_lists<S: AsRef<str>>(&mut self, docs: &[Vec<S>]) {
        for word in docs.iter().flatten() {
            let word = word.as_ref();
            match self.counts.get_mut(word) {
                Some(n) => *n += 1,
                None => {
                    self.counts.insert(word.to_string(), 1);
                    self.first_seen.push(word.to_string());
                }
            }
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        let mut ranked: Vec<&String> = self.first_seen.iter().collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| self.counts[*b].cmp(&self.counts[*a]));
        self.word_index = ranked
            .into_iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i + 1))
            .collect();
    }

    /// Rank of `word`, if it was seen during fitting.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_index.get(word).copied()
    }

    /// The whole vocabulary ordered by rank.
    pub fn word_index(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .word_index
            .iter()
            .map(|(w, &i)| (w.clone(), i))
            .collect();
        entries.sort_by_key(|&(_, i)| i);
        entries
    }

    /// Map each document to ranks, dropping unknown and out-of-range words.
    pub fn texts_to_sequences<S: AsRef<str>>(&self, docs: &[Vec<S>]) -> Vec<Vec<usize>> {
        docs.iter()
            .map(|doc| {
                doc.iter()
                    .filter_map(|w| self.index_of(w.as_ref()))
                    .filter(|&i| self.num_words.is_none_or(|n| i < n))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    #[test]
    fn ranks_by_frequency_then_first_seen() {
        let mut tok = Tokenizer::new(None);
        tok.fit_on_token_lists(&docs(&[&["b", "a", "c"], &["a", "c", "d"], &["a"]]));

        assert_eq!(
            tok.word_index(),
            vec![
                ("a".to_string(), 1),
                ("c".to_string(), 2),
                ("b".to_string(), 3),
                ("d".to_string(), 4),
            ]
        );
    }

    #[test]
    fn num_words_keeps_ranks_below_limit() {
        let corpus = docs(&[&["x", "x", "x", "y", "y", "z", "w", "v"]]);
        let mut tok = Tokenizer::new(Some(3));
        tok.fit_on_token_lists(&corpus);

        // ranks: x=1, y=2, z=3, w=4, v=5; only 1 and 2 survive
        assert_eq!(tok.texts_to_sequences(&corpus), vec![vec![1, 1, 1, 2, 2]]);
        // the index itself is not truncated
        assert_eq!(tok.word_index().len(), 5);
    }

    #[test]
    fn unknown_words_are_dropped() {
        let mut tok = Tokenizer::new(None);
        tok.fit_on_token_lists(&docs(&[&["сеть", "граф"]]));
        let seqs = tok.texts_to_sequences(&docs(&[&["граф", "новое", "сеть"]]));
        assert_eq!(seqs, vec![vec![2, 1]]);
    }

    #[test]
    fn counts_span_documents() {
        let mut tok = Tokenizer::new(None);
        tok.fit_on_token_lists(&docs(&[&["b", "a"], &["a"]]));
        assert_eq!(tok.index_of("a"), Some(1));
        assert_eq!(tok.index_of("b"), Some(2));
    }

    #[test]
    fn refitting_accumulates_counts() {
        let mut tok = Tokenizer::new(None);
        tok.fit_on_token_lists(&docs(&[&["a", "b"]]));
        tok.fit_on_token_lists(&docs(&[&["b"]]));
        assert_eq!(tok.index_of("b"), Some(1));
        assert_eq!(tok.index_of("a"), Some(2));
    }
}
