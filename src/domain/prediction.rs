// ============================================================
// Layer 3 — Prediction Result
// ============================================================
// Every model family ends in the same place: a two-element
// probability vector where index 0 is ALWAYS the negative
// class and index 1 the positive class. This ordering is a
// property of the artifacts, the adapter cannot verify it.
//
// From that vector we derive:
//   predicted_class = argmax(p)        (ties → index 0)
//   confidence      = p[predicted_class]
//   probabilities   = { negative: p[0], positive: p[1] }
//
// Invariants enforced here:
//   |p[0] + p[1] - 1| < PROBABILITY_TOLERANCE
//   every p[i] is finite and inside [0, 1]

use serde::{Deserialize, Serialize};

use crate::domain::error::PredictError;

/// Maximum drift allowed between p_negative + p_positive and 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-2;

/// The two sentiment classes, in artifact index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Positive),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    /// Wire code used in the `sentiment` field ("0" / "1")
    pub fn code(self) -> &'static str {
        match self {
            Sentiment::Negative => "0",
            Sentiment::Positive => "1",
        }
    }

    /// Human label used in `sentiment_label`
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Negative => "Négatif",
            Sentiment::Positive => "Positif",
        }
    }

    /// Parse a user-supplied label. Accepts the wire codes, the
    /// French labels, and the English words, case-insensitively.
    pub fn parse_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" | "négatif" | "negatif" | "negative" | "neg" => Some(Sentiment::Negative),
            "1" | "positif" | "positive" | "pos"             => Some(Sentiment::Positive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub positive: f64,
}

impl ClassProbabilities {
    pub fn of(&self, class: Sentiment) -> f64 {
        match class {
            Sentiment::Negative => self.negative,
            Sentiment::Positive => self.positive,
        }
    }
}

/// The uniform output of the prediction adapter
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub predicted_class: Sentiment,
    pub confidence:      f64,
    pub probabilities:   ClassProbabilities,
}

impl PredictionResult {
    /// Normalise a raw probability vector into a result.
    /// Anything other than a valid two-class distribution is
    /// an inference failure, not a panic.
    pub fn from_probabilities(probs: &[f64]) -> Result<Self, PredictError> {
        let [negative, positive] = probs else {
            return Err(PredictError::inference(format!(
                "expected 2 class probabilities, got {}",
                probs.len()
            )));
        };
        let (negative, positive) = (*negative, *positive);

        for p in [negative, positive] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(PredictError::inference(format!(
                    "probability out of range: {p}"
                )));
            }
        }

        let total = negative + positive;
        if (total - 1.0).abs() >= PROBABILITY_TOLERANCE {
            return Err(PredictError::inference(format!(
                "class probabilities sum to {total:.4}, expected 1"
            )));
        }

        let predicted_class = if positive > negative {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };
        let probabilities = ClassProbabilities { negative, positive };

        Ok(Self {
            predicted_class,
            confidence: probabilities.of(predicted_class),
            probabilities,
        })
    }
}
