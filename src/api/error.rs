// ============================================================
// Layer 1 — HTTP Error Mapping
// ============================================================
//   Validation / bad JSON → 422 {"detail": "<reason>"}
//   ModelUnavailable      → 503 {"detail": "Model not loaded"}
//   Inference / worker    → 500 {"detail": "Prediction failed"}
//
// The 500 body never carries the native error text; the full
// message goes to the log instead.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::domain::error::PredictError;
use crate::domain::wire::ErrorDetail;

const INTERNAL_DETAIL: &str = "Prediction failed";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// Body could not be deserialised into the request shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The blocking pool dropped the prediction
    #[error("Prediction worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    fn detail(&self) -> String {
        match self {
            ApiError::Predict(PredictError::Inference(_)) | ApiError::Worker(_) => {
                INTERNAL_DETAIL.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Predict(PredictError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody(_)                       => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Predict(PredictError::ModelUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Predict(PredictError::Inference(_))  => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Worker(_)                            => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{status}: {self}");
        } else {
            tracing::warn!("{status}: {self}");
        }
        HttpResponse::build(status).json(ErrorDetail { detail: self.detail() })
    }
}
