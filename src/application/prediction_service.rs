// ============================================================
// Layer 2 — Prediction Service
// ============================================================
// Owns the model lifecycle and turns raw request texts into
// response shapes:
//
//   new(config)      → Unloaded
//   load()           → Loaded on success; on failure the state
//                      is left exactly as it was
//   predict_one()    → availability check, validation, adapter,
//                      response shaping
//   predict_batch()  → same, all-or-nothing over the batch
//   health()/models() → status for operators and dashboards
//
//        ┌──────────┐  load() ok   ┌────────┐
//        │ Unloaded │ ───────────▶ │ Loaded │
//        └──────────┘              └────────┘
//          ▲     │ load() err         │ load() err
//          └─────┘                    └──▶ stays Loaded
//
// Availability is checked before validation, so an Unloaded
// service answers ModelUnavailable to every predict call,
// even `{"text": ""}`. A body that cannot be decoded into a
// request never reaches the service: the HTTP layer rejects
// it with 422 whether a model is loaded or not.
//
// The service is immutable once loaded and is shared across
// HTTP workers as web::Data (an Arc); no locking happens here.

use burn::prelude::Backend;
use serde::{Deserialize, Serialize};

use crate::data::validation::{validate_batch, validate_text};
use crate::domain::error::{LoadError, PredictError};
use crate::domain::model_kind::ModelKind;
use crate::domain::wire::{
    now_timestamp, ArtifactFile, ArtifactReport, BatchPredictionOutput, HealthResponse,
    HealthStatus, ModelInfo, PredictionOutput,
};
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::adapter::PredictionAdapter;
use crate::ml::InferBackend;

pub const DEFAULT_MODEL_TYPE: &str = "logistic";
pub const DEFAULT_MODEL_PATH: &str = "./models/logistic_regression_model.json";

/// Characters of a text shown in the request log
const LOG_PREVIEW_CHARS: usize = 50;

// ─── Model Configuration ─────────────────────────────────────────────────────
// The raw MODEL_TYPE string is kept as given: an unknown tag
// fails at load() and is still echoed by health/models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_type: String,
    pub model_path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

pub enum ServiceState<B: Backend> {
    Unloaded,
    Loaded(PredictionAdapter<B>),
}

// ─── PredictionService ───────────────────────────────────────────────────────
pub struct PredictionService<B: Backend = InferBackend> {
    config:     ModelConfig,
    state:      ServiceState<B>,
    /// Message of the most recent failed load(), cleared on success
    last_error: Option<String>,
}

impl<B: Backend> PredictionService<B> {
    pub fn new(config: ModelConfig) -> Self {
        Self { config, state: ServiceState::Unloaded, last_error: None }
    }

    /// Service already holding an adapter, bypassing the artifact store
    #[cfg(test)]
    pub fn with_adapter(config: ModelConfig, adapter: PredictionAdapter<B>) -> Self {
        Self { config, state: ServiceState::Loaded(adapter), last_error: None }
    }

    /// Resolve and load the configured artifact. A failure leaves
    /// the current state untouched (a loaded model stays loaded).
    pub fn load(&mut self) -> Result<(), LoadError> {
        let outcome = self
            .config
            .model_type
            .parse::<ModelKind>()
            .and_then(|kind| {
                ArtifactStore::new(kind, &self.config.model_path).load::<B>(Default::default())
            });

        match outcome {
            Ok(adapter) => {
                tracing::info!(
                    "Model '{}' loaded from '{}'",
                    self.config.model_type,
                    self.config.model_path
                );
                self.state = ServiceState::Loaded(adapter);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load model '{}': {e}", self.config.model_type);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ServiceState::Loaded(_))
    }

    /// The configured tag, verbatim
    pub fn model_type(&self) -> &str {
        &self.config.model_type
    }

    pub fn model_path(&self) -> &str {
        &self.config.model_path
    }

    fn adapter(&self) -> Result<&PredictionAdapter<B>, PredictError> {
        match &self.state {
            ServiceState::Loaded(adapter) => Ok(adapter),
            ServiceState::Unloaded        => Err(PredictError::ModelUnavailable),
        }
    }

    fn predict_validated(
        &self,
        adapter: &PredictionAdapter<B>,
        text:    &str,
    ) -> Result<PredictionOutput, PredictError> {
        let result = adapter.predict(text)?;
        tracing::info!(
            "Prediction: '{}' → {} ({:.3})",
            preview(text),
            result.predicted_class.label(),
            result.confidence
        );
        Ok(PredictionOutput::new(text, &result, self.model_type()))
    }

    pub fn predict_one(&self, text: &str) -> Result<PredictionOutput, PredictError> {
        let adapter = self.adapter()?;
        let text    = validate_text(text)?;
        self.predict_validated(adapter, text)
    }

    /// Predictions for the non-empty items, in input order. The
    /// first failure aborts the whole batch.
    pub fn predict_batch<S: AsRef<str>>(
        &self,
        tweets: &[S],
    ) -> Result<BatchPredictionOutput, PredictError> {
        let adapter = self.adapter()?;
        let texts   = validate_batch(tweets)?;

        let predictions = texts
            .iter()
            .map(|text| self.predict_validated(adapter, text))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("Batch prediction: {} tweets", predictions.len());
        Ok(BatchPredictionOutput {
            count:      predictions.len(),
            predictions,
            model_type: self.model_type().to_string(),
            timestamp:  now_timestamp(),
        })
    }

    pub fn health(&self) -> HealthResponse {
        let loaded = self.is_loaded();
        HealthResponse {
            status:       if loaded { HealthStatus::Healthy } else { HealthStatus::Degraded },
            model_loaded: loaded,
            model_type:   self.model_type().to_string(),
            timestamp:    now_timestamp(),
        }
    }

    pub fn models(&self) -> ModelInfo {
        ModelInfo {
            available_models: ModelKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            current_model:    self.model_type().to_string(),
            model_path:       self.model_path().to_string(),
        }
    }
}

impl<B: Backend> PredictionService<B> {
    /// Read-only view of the artifact files behind the configured
    /// model. Only touches file metadata; nothing is reloaded.
    pub fn artifact_report(&self) -> ArtifactReport {
        let files = match self.config.model_type.parse::<ModelKind>() {
            Ok(kind) => ArtifactStore::new(kind, &self.config.model_path)
                .paths()
                .with_roles()
                .into_iter()
                .map(|(role, path)| ArtifactFile {
                    role:   role.to_string(),
                    path:   path.display().to_string(),
                    exists: path.is_file(),
                })
                .collect(),
            Err(_) => Vec::new(),
        };

        ArtifactReport {
            cwd: std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            model_type:      self.config.model_type.clone(),
            model_path:      self.config.model_path.clone(),
            model_loaded:    self.is_loaded(),
            files,
            last_load_error: self.last_error.clone(),
            vocabulary_size: self.adapter().ok().map(|a| a.vocabulary_size()),
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
