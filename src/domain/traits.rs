// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//
//   TextClassifier — implemented once per model family in
//                    Layer 5. Returns the RAW class probability
//                    vector; normalisation is the adapter's job.
//
//   JsonArtifact   — anything read from a JSON artifact file
//                    (TF-IDF vectorizer, word index, logistic
//                    coefficients). validate() runs right after
//                    parsing so a half-usable artifact is never
//                    handed to the ML layer.
//
//   FeedbackSink   — where correction events go. The PostHog
//                    client implements it; tests use a recorder.
//
// Reference: Rust Book §10 (Traits), §17 (Trait Objects)

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::error::{FeedbackError, LoadError, PredictError};
use crate::domain::feedback::FeedbackEvent;

// ─── TextClassifier ───────────────────────────────────────────────────────────
/// One model family's encode → infer → decode path.
pub trait TextClassifier {
    /// Class probabilities for one already-validated text,
    /// index 0 = negative, index 1 = positive.
    fn class_probabilities(&self, text: &str) -> Result<Vec<f64>, PredictError>;

    /// Entries in the fitted text transform (tokens, words or
    /// TF-IDF terms), reported by the diagnostics endpoint.
    fn vocabulary_size(&self) -> usize;
}

// ─── JsonArtifact ─────────────────────────────────────────────────────────────
/// A fitted object exported to JSON by the training pipeline.
/// Reading the file is Layer 6's job (infra::tokenizer_store).
pub trait JsonArtifact: DeserializeOwned + Sized {
    /// Reject structurally unusable content (e.g. empty vocabulary).
    fn validate(&self) -> Result<(), LoadError>;
}

// ─── FeedbackSink ─────────────────────────────────────────────────────────────
/// Any destination for user correction events.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// False when the sink has no credentials; callers report
    /// that instead of attempting delivery.
    fn is_configured(&self) -> bool;

    /// Deliver one event, at most once. No retries.
    async fn send(&self, event: &FeedbackEvent) -> Result<(), FeedbackError>;
}
