// ============================================================
// Layer 3 — Model Kind and Family
// ============================================================
// The operator configures a model *kind* (MODEL_TYPE):
//
//   bert     → TransformerClassifier
//   lstm     → SequenceClassifier
//   cnn      → SequenceClassifier
//   logistic → LinearClassifier
//
// The *family* decides the encode / infer / decode path.
// The kind is what clients see as `model_type`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::LoadError;

/// The three structurally different model architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Subword tokenizer + transformer encoder, softmax over logits
    TransformerClassifier,
    /// Word-index tokenizer + LSTM/CNN, sigmoid scalar or softmax pair
    SequenceClassifier,
    /// TF-IDF vectorizer + logistic regression
    LinearClassifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Bert,
    Lstm,
    Cnn,
    Logistic,
}

impl ModelKind {
    /// Every kind the service knows how to load, in the order
    /// reported by `GET /models`
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Bert,
        ModelKind::Lstm,
        ModelKind::Cnn,
        ModelKind::Logistic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Bert     => "bert",
            ModelKind::Lstm     => "lstm",
            ModelKind::Cnn      => "cnn",
            ModelKind::Logistic => "logistic",
        }
    }

    pub fn family(self) -> ModelFamily {
        match self {
            ModelKind::Bert                 => ModelFamily::TransformerClassifier,
            ModelKind::Lstm | ModelKind::Cnn => ModelFamily::SequenceClassifier,
            ModelKind::Logistic             => ModelFamily::LinearClassifier,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| LoadError::UnknownModelType(s.to_string()))
    }
}
