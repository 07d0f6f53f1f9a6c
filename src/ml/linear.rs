// ============================================================
// Layer 5 — Logistic Regression (linear family)
// ============================================================
// A binary scikit-learn LogisticRegression exported as:
//
//   { "coef": [w0, w1, ...], "intercept": b, "classes": [0, 1] }
//
//   decision(x)      = w · x + b
//   predict_proba(x) = [1 - σ(decision), σ(decision)]
//
// `coef` is `model.coef_[0]`; its width must match the TF-IDF
// feature space. `classes`, when present, must be [0, 1] so
// that column 0 really is the negative class.

use serde::Deserialize;

use crate::data::tfidf::TfidfVectorizer;
use crate::domain::error::{LoadError, PredictError};
use crate::domain::traits::{JsonArtifact, TextClassifier};

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef:      Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub classes:   Option<Vec<i64>>,
}

impl LogisticRegression {
    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    /// w · x + b over a sparse row
    pub fn decision_function(&self, row: &[(usize, f64)]) -> f64 {
        row.iter()
            .map(|&(col, value)| self.coef.get(col).copied().unwrap_or(0.0) * value)
            .sum::<f64>()
            + self.intercept
    }

    pub fn predict_proba(&self, row: &[(usize, f64)]) -> [f64; 2] {
        let positive = sigmoid(self.decision_function(row));
        [1.0 - positive, positive]
    }
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl JsonArtifact for LogisticRegression {
    fn validate(&self) -> Result<(), LoadError> {
        if self.coef.is_empty() {
            return Err(LoadError::incompatible("logistic model has no coefficients"));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err(LoadError::incompatible("logistic model has non-finite weights"));
        }
        if let Some(classes) = &self.classes {
            if classes.as_slice() != [0, 1] {
                return Err(LoadError::incompatible(format!(
                    "logistic model classes must be [0, 1], got {classes:?}"
                )));
            }
        }
        Ok(())
    }
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// Plain Rust, immutable after construction: no gate needed.
pub struct LinearPredictor {
    vectorizer: TfidfVectorizer,
    model:      LogisticRegression,
}

impl LinearPredictor {
    /// Fails when the vectorizer and the model disagree on the
    /// width of the feature space.
    pub fn new(vectorizer: TfidfVectorizer, model: LogisticRegression) -> Result<Self, LoadError> {
        if vectorizer.n_features() != model.n_features() {
            return Err(LoadError::incompatible(format!(
                "vectorizer produces {} features but the model expects {}",
                vectorizer.n_features(),
                model.n_features()
            )));
        }
        Ok(Self { vectorizer, model })
    }
}

impl TextClassifier for LinearPredictor {
    fn class_probabilities(&self, text: &str) -> Result<Vec<f64>, PredictError> {
        let row = self.vectorizer.transform(text);
        tracing::debug!("TF-IDF row has {} non-zero terms", row.len());
        Ok(self.model.predict_proba(&row).to_vec())
    }

    fn vocabulary_size(&self) -> usize {
        self.vectorizer.n_features()
    }
}
