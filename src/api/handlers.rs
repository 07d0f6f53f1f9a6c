// ============================================================
// Layer 1 — HTTP Handlers
// ============================================================
// Thin adapters between actix-web and the PredictionService.
// Inference is CPU-bound, so predictions run on the blocking
// pool via web::block and the async workers stay free.

use actix_web::{web, HttpResponse};

use crate::api::error::ApiError;
use crate::application::prediction_service::PredictionService;
use crate::domain::wire::{now_timestamp, TweetBatchInput, TweetInput};

/// `GET /`
pub async fn root(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message":     "Tweet Sentiment Analysis API",
        "version":     env!("CARGO_PKG_VERSION"),
        "description": "Sentiment prediction for airline tweets",
        "endpoints": {
            "predict":       "/predict",
            "predict_batch": "/predict/batch",
            "health":        "/health",
            "models":        "/models",
            "debug_files":   "/debug/files",
        },
        "model_type":  service.model_type(),
        "timestamp":   now_timestamp(),
    }))
}

/// `GET /health`
pub async fn health(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(service.health())
}

/// `GET /models`
pub async fn models(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(service.models())
}

/// `GET /debug/files`
pub async fn debug_files(service: web::Data<PredictionService>) -> HttpResponse {
    HttpResponse::Ok().json(service.artifact_report())
}

/// `POST /predict`
pub async fn predict(
    service: web::Data<PredictionService>,
    body:    web::Json<TweetInput>,
) -> Result<HttpResponse, ApiError> {
    let TweetInput { text } = body.into_inner();
    let output = web::block(move || service.predict_one(&text))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;
    Ok(HttpResponse::Ok().json(output))
}

/// `POST /predict/batch`
pub async fn predict_batch(
    service: web::Data<PredictionService>,
    body:    web::Json<TweetBatchInput>,
) -> Result<HttpResponse, ApiError> {
    let TweetBatchInput { tweets } = body.into_inner();
    let output = web::block(move || service.predict_batch(&tweets))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;
    Ok(HttpResponse::Ok().json(output))
}

/// `OPTIONS` on any route: the CORS headers are added by the
/// DefaultHeaders middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
