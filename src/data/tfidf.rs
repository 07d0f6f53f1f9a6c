// ============================================================
// Layer 4 — TF-IDF Vectorizer (linear family)
// ============================================================
// Re-implements scikit-learn's `TfidfVectorizer.transform`
// for a vectorizer fitted in Python and exported to JSON:
//
//   {
//     "vocabulary":   { "term": column, ... },
//     "idf":          [ ... one weight per column ... ],
//     "ngram_range":  [1, 2],
//     "lowercase":    true,
//     "sublinear_tf": false,
//     "norm":         "l2",
//     "token_pattern": "(?u)\\b\\w\\w+\\b"
//   }
//
// Transform steps:
//   1. lowercase
//   2. tokens = every match of token_pattern
//   3. word n-grams for n in ngram_range, joined by " "
//   4. keep only terms in the vocabulary (OOV silently dropped)
//   5. tf = raw count (or 1 + ln(count) when sublinear_tf)
//   6. x[col] = tf * idf[col]
//   7. normalise the row (L2 by default)
//
// The result is a sparse row: (column, value) pairs sorted by
// column. An all-OOV text yields an empty row.

use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::error::LoadError;
use crate::domain::traits::JsonArtifact;

/// scikit-learn's default token pattern: words of 2+ characters
pub const SKLEARN_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_ngram_range()   -> (usize, usize) { (1, 1) }
fn default_lowercase()     -> bool           { true }
fn default_norm()          -> Option<Norm>   { Some(Norm::L2) }
fn default_token_pattern() -> String         { SKLEARN_TOKEN_PATTERN.to_string() }

/// The fitted state exactly as exported from Python
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfParams {
    pub vocabulary: HashMap<String, usize>,
    pub idf:        Vec<f64>,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
}

impl JsonArtifact for TfidfParams {
    fn validate(&self) -> Result<(), LoadError> {
        if self.vocabulary.is_empty() {
            return Err(LoadError::incompatible("TF-IDF vectorizer has no fitted vocabulary"));
        }
        if self.idf.is_empty() {
            return Err(LoadError::incompatible("TF-IDF vectorizer has no idf weights"));
        }
        if let Some(&col) = self.vocabulary.values().max() {
            if col >= self.idf.len() {
                return Err(LoadError::incompatible(format!(
                    "vocabulary column {col} has no idf weight ({} weights)",
                    self.idf.len()
                )));
            }
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(LoadError::incompatible(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        Ok(())
    }
}

pub struct TfidfVectorizer {
    params:      TfidfParams,
    token_regex: Regex,
}

impl TfidfVectorizer {
    pub fn new(params: TfidfParams) -> Result<Self, LoadError> {
        params.validate()?;
        let token_regex = Regex::new(&params.token_pattern).map_err(|e| {
            LoadError::incompatible(format!("invalid token_pattern: {e}"))
        })?;
        Ok(Self { params, token_regex })
    }

    /// Width of the feature space (= number of idf weights)
    pub fn n_features(&self) -> usize {
        self.params.idf.len()
    }

    /// Tokenise and expand into word n-grams
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.params.lowercase { text.to_lowercase() } else { text.to_string() };
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.params.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// One sparse TF-IDF row, sorted by column
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.params.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, count)| {
                let tf = if self.params.sublinear_tf { 1.0 + count.ln() } else { count };
                (col, tf * self.params.idf[col])
            })
            .collect();

        let norm = match self.params.norm {
            Some(Norm::L2) => row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None           => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
        row
    }
}
