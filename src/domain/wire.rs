// ============================================================
// Layer 3 — Wire Shapes
// ============================================================
// The JSON bodies exchanged over HTTP. Shared by the server
// (Layer 1, api/) and the dashboard-side client (Layer 6,
// infra/api_client.rs) so both ends agree on field names.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::prediction::{ClassProbabilities, PredictionResult};

/// RFC 3339 timestamp stamped on every response
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─── Requests ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetBatchInput {
    pub tweets: Vec<String>,
}

// ─── Responses ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub text:            String,
    /// "0" or "1"
    pub sentiment:       String,
    /// "Négatif" or "Positif"
    pub sentiment_label: String,
    pub confidence:      f64,
    pub probabilities:   ClassProbabilities,
    pub timestamp:       String,
    pub model_type:      String,
}

impl PredictionOutput {
    pub fn new(text: &str, result: &PredictionResult, model_type: &str) -> Self {
        Self {
            text:            text.to_string(),
            sentiment:       result.predicted_class.code().to_string(),
            sentiment_label: result.predicted_class.label().to_string(),
            confidence:      result.confidence,
            probabilities:   result.probabilities,
            timestamp:       now_timestamp(),
            model_type:      model_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionOutput {
    pub predictions: Vec<PredictionOutput>,
    pub count:       usize,
    pub model_type:  String,
    pub timestamp:   String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:       HealthStatus,
    pub model_loaded: bool,
    pub model_type:   String,
    pub timestamp:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub available_models: Vec<String>,
    pub current_model:    String,
    pub model_path:       String,
}

/// One file of the configured artifact, as resolved on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// classifier, config, or transform
    pub role:   String,
    pub path:   String,
    pub exists: bool,
}

/// `GET /debug/files`: what the loader saw, so an operator can
/// tell a missing file from an unusable one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub cwd:             String,
    pub model_type:      String,
    pub model_path:      String,
    pub model_loaded:    bool,
    /// Empty when the model type is unknown
    pub files:           Vec<ArtifactFile>,
    pub last_load_error: Option<String>,
    /// Size of the loaded text transform's vocabulary
    pub vocabulary_size: Option<usize>,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
