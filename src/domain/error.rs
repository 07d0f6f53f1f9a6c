// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Three families of failure, one enum each:
//
//   LoadError     — the artifact could not be brought up.
//                   The process keeps running, unloaded.
//   PredictError  — a request-level failure:
//                     Validation       → user-correctable (4xx)
//                     ModelUnavailable → service not ready (503)
//                     Inference        → native failure (500)
//   FeedbackError — the analytics sink refused or never got
//                   the event. Reported, never retried.
//
// Reference: Rust Book §9 (Error Handling), thiserror docs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Artifact unusable: {0}")]
    ArtifactIncompatible(String),

    #[error("Unknown model type '{0}' (expected one of bert, lstm, cnn, logistic)")]
    UnknownModelType(String),
}

impl LoadError {
    /// Shorthand used by the artifact readers
    pub fn incompatible(msg: impl Into<String>) -> Self {
        LoadError::ArtifactIncompatible(msg.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("{0}")]
    Validation(String),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PredictError::Validation(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        PredictError::Inference(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Analytics sink not configured (set POSTHOG_API_KEY)")]
    NotConfigured,

    #[error("Feedback delivery failed: {0}")]
    Delivery(String),

    #[error("Analytics backend rejected the event with status {0}")]
    Rejected(u16),
}
