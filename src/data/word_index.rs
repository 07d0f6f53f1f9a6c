// ============================================================
// Layer 4 — Word Index Tokenizer (sequence family)
// ============================================================
// Mirrors the Keras `Tokenizer` + `pad_sequences` pair the
// LSTM/CNN models were trained with:
//
//   1. lowercase (when `lower`)
//   2. every filter character becomes the split character
//   3. split, drop empty pieces
//   4. word → index through the fitted `word_index`
//        unknown word      → dropped, or the OOV index
//        index ≥ num_words → dropped, or the OOV index
//   5. pad_sequence: keep the LAST max_len indices, then
//      pad with 0 at the end ("post" padding)
//
// Index 0 is reserved for padding and never appears in a
// fitted vocabulary.

use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::error::LoadError;
use crate::domain::traits::JsonArtifact;

/// Keras' default `filters` argument
pub const KERAS_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

fn default_lower()   -> bool   { true }
fn default_filters() -> String { KERAS_FILTERS.to_string() }
fn default_split()   -> String { " ".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct WordIndex {
    pub word_index: HashMap<String, u32>,

    #[serde(default)]
    pub num_words: Option<u32>,

    #[serde(default)]
    pub oov_token: Option<String>,

    #[serde(default = "default_lower")]
    pub lower: bool,

    #[serde(default = "default_filters")]
    pub filters: String,

    #[serde(default = "default_split")]
    pub split: String,
}

impl WordIndex {
    /// Largest index the model's embedding must cover
    pub fn max_index(&self) -> u32 {
        let max = self.word_index.values().copied().max().unwrap_or(0);
        match self.num_words {
            Some(n) => max.min(n.saturating_sub(1)),
            None    => max,
        }
    }

    fn oov_index(&self) -> Option<u32> {
        self.oov_token
            .as_ref()
            .and_then(|t| self.word_index.get(t))
            .copied()
    }

    fn words(&self, text: &str) -> Vec<String> {
        let text = if self.lower { text.to_lowercase() } else { text.to_string() };
        let split = self.split.chars().next().unwrap_or(' ');
        let translated: String = text
            .chars()
            .map(|c| if self.filters.contains(c) { split } else { c })
            .collect();
        translated
            .split(split)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `texts_to_sequences` for one text
    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        let oov = self.oov_index();
        self.words(text)
            .iter()
            .filter_map(|w| match self.word_index.get(w) {
                Some(&i) if self.num_words.map_or(true, |n| i < n) => Some(i),
                _ => oov,
            })
            .collect()
    }
}

/// Post-padding with 0; over-long sequences keep their tail.
pub fn pad_sequence(sequence: &[u32], max_len: usize) -> Vec<u32> {
    let start = sequence.len().saturating_sub(max_len);
    let mut padded = sequence[start..].to_vec();
    padded.resize(max_len, 0);
    padded
}

impl JsonArtifact for WordIndex {
    fn validate(&self) -> Result<(), LoadError> {
        if self.word_index.is_empty() {
            return Err(LoadError::incompatible("word index has no fitted vocabulary"));
        }
        if self.word_index.values().any(|&i| i == 0) {
            return Err(LoadError::incompatible(
                "word index uses 0, which is reserved for padding",
            ));
        }
        Ok(())
    }
}
