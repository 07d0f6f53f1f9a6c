// ============================================================
// Layer 3 — Feedback Event
// ============================================================
// Produced when a user says "this prediction is wrong" and
// picks the real sentiment. Forwarded immediately to the
// analytics sink; this process never keeps a copy.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::prediction::Sentiment;

/// Maximum number of characters of the tweet sent to analytics
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// The only feedback type the dashboard emits
pub const INCORRECT_PREDICTION: &str = "incorrect_prediction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub feedback_type:       String,
    pub text_preview:        String,
    pub text_length:         usize,
    pub predicted_sentiment: String,
    pub actual_sentiment:    String,
    pub confidence:          f64,
    pub model_type:          String,
    pub timestamp:           String,
    pub source:              String,
}

impl FeedbackEvent {
    pub fn incorrect_prediction(
        text:       &str,
        predicted:  Sentiment,
        actual:     Sentiment,
        confidence: f64,
        model_type: impl Into<String>,
        source:     impl Into<String>,
    ) -> Self {
        Self {
            feedback_type:       INCORRECT_PREDICTION.to_string(),
            text_preview:        text.chars().take(TEXT_PREVIEW_CHARS).collect(),
            text_length:         text.chars().count(),
            predicted_sentiment: predicted.label().to_string(),
            actual_sentiment:    actual.label().to_string(),
            confidence,
            model_type:          model_type.into(),
            timestamp:           Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source:              source.into(),
        }
    }
}
