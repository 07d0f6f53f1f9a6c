// ============================================================
// Layer 1 — HTTP Service Boundary
// ============================================================
// The JSON API served by `tweet-sentiment serve`:
//
//   GET  /               service description
//   POST /predict        {text}   → one prediction
//   POST /predict/batch  {tweets} → predictions in input order
//   GET  /health         status, model_loaded, model_type
//   GET  /models         available kinds, current kind, path
//   GET  /debug/files    artifact files on disk, last load error
//
// One PredictionService is built and loaded before the server
// starts, then shared read-only with every worker through
// web::Data. Every response carries permissive CORS headers.
//
// Reference: actix-web docs (App, ServiceConfig, ResponseError)

/// Error → status code + {"detail"} body
pub mod error;

/// Request handlers
pub mod handlers;

use actix_web::{http::Method, middleware::DefaultHeaders, web, App, HttpServer};

use crate::api::error::ApiError;
use crate::application::prediction_service::PredictionService;

/// Permissive CORS, added to every response
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "*"))
}

/// Undecodable bodies are a validation failure (422), not a 400
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidBody(err.to_string()).into())
}

/// Register every route; the caller provides the service as web::Data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/")
                .route(web::get().to(handlers::root))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        )
        .service(
            web::resource("/predict")
                .route(web::post().to(handlers::predict))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        )
        .service(
            web::resource("/predict/batch")
                .route(web::post().to(handlers::predict_batch))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(handlers::health))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        )
        .service(
            web::resource("/models")
                .route(web::get().to(handlers::models))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        )
        .service(
            web::resource("/debug/files")
                .route(web::get().to(handlers::debug_files))
                .route(web::method(Method::OPTIONS).to(handlers::preflight)),
        );
}

/// Serve until the process is stopped.
pub async fn run_server(
    service: PredictionService,
    host:    &str,
    port:    u16,
    workers: usize,
) -> std::io::Result<()> {
    let data = web::Data::new(service);

    tracing::info!(
        "Starting API on http://{host}:{port} ({} workers, model '{}', loaded: {})",
        workers.max(1),
        data.model_type(),
        data.is_loaded()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .app_data(data.clone())
            .configure(configure_routes)
    })
    .workers(workers.max(1))
    .bind((host, port))?
    .run()
    .await?;

    tracing::info!("Server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::prediction_service::{ModelConfig, DEFAULT_MODEL_PATH};
    use crate::domain::wire::{
        ArtifactReport, BatchPredictionOutput, ErrorDetail, HealthResponse, HealthStatus,
        ModelInfo, PredictionOutput,
    };
    use crate::ml::adapter::PredictionAdapter;
    use crate::ml::linear::LinearPredictor;
    use crate::test_support::{linear_artifacts, nan_weight_linear, p07_intercept};
    use actix_web::{http::header::ContentType, http::StatusCode, test};
    use serde_json::json;

    fn loaded_service() -> PredictionService {
        let (vectorizer, model) = linear_artifacts(p07_intercept());
        PredictionService::with_adapter(
            ModelConfig::default(),
            PredictionAdapter::Linear(LinearPredictor::new(vectorizer, model).unwrap()),
        )
    }

    fn unloaded_service() -> PredictionService {
        PredictionService::new(ModelConfig::default())
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .wrap(cors_headers())
                    .app_data(web::Data::new($service))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_predict_concrete_scenario() {
        let app = app!(loaded_service());
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": "This is an amazing product! I love it!"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");

        let out: PredictionOutput = test::read_body_json(resp).await;
        assert_eq!(out.sentiment, "1");
        assert_eq!(out.sentiment_label, "Positif");
        assert!((out.confidence - 0.7).abs() < 1e-9);
        assert!((out.probabilities.negative - 0.3).abs() < 1e-9);
        assert_eq!(out.model_type, "logistic");
        assert!(chrono::DateTime::parse_from_rfc3339(&out.timestamp).is_ok());
    }

    #[actix_web::test]
    async fn test_predict_validation_is_422() {
        let app = app!(loaded_service());
        let too_long = "x".repeat(281);
        for text in ["", "   ", too_long.as_str()] {
            let req = test::TestRequest::post()
                .uri("/predict")
                .set_json(json!({ "text": text }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[actix_web::test]
    async fn test_malformed_body_is_422_with_detail() {
        let app = app!(loaded_service());

        let req = test::TestRequest::post()
            .uri("/predict")
            .insert_header(ContentType::json())
            .set_payload("{\"text\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert!(!body.detail.is_empty());

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"tweet": "wrong field"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_inference_failure_is_generic_500() {
        let service: PredictionService = PredictionService::with_adapter(
            ModelConfig::default(),
            PredictionAdapter::Linear(nan_weight_linear()),
        );
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!({"tweets": ["great", "rude"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Prediction failed");

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": "rude"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Prediction failed");

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": "great"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_unloaded_is_503() {
        let app = app!(unloaded_service());
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": "any"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Model not loaded");

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!({"tweets": ["a", "b"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        // A decodable but empty text still reaches the service
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": ""}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SERVICE_UNAVAILABLE);

        // An undecodable body is rejected before the service is asked
        let req = test::TestRequest::post()
            .uri("/predict")
            .insert_header(ContentType::json())
            .set_payload("{\"text\": ")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_batch_keeps_order() {
        let app = app!(loaded_service());
        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!({"tweets": ["rude delay", "", "great crew"]}))
            .to_request();
        let out: BatchPredictionOutput = test::call_and_read_body_json(&app, req).await;
        assert_eq!(out.count, 2);
        assert_eq!(out.predictions[0].text, "rude delay");
        assert_eq!(out.predictions[0].sentiment, "0");
        assert_eq!(out.predictions[1].text, "great crew");
        assert_eq!(out.predictions[1].sentiment, "1");
    }

    #[actix_web::test]
    async fn test_batch_bounds() {
        let app = app!(loaded_service());
        let hundred: Vec<String> = (0..100).map(|i| format!("tweet {i}")).collect();
        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!({ "tweets": hundred }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let too_many: Vec<String> = (0..101).map(|i| format!("tweet {i}")).collect();
        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!({ "tweets": too_many }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[actix_web::test]
    async fn test_health_and_models() {
        let app = app!(unloaded_service());

        let req = test::TestRequest::get().uri("/health").to_request();
        let health: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.model_loaded);

        let req = test::TestRequest::get().uri("/models").to_request();
        let info: ModelInfo = test::call_and_read_body_json(&app, req).await;
        assert_eq!(info.available_models, vec!["bert", "lstm", "cnn", "logistic"]);
        assert_eq!(info.current_model, "logistic");

        let req = test::TestRequest::get().uri("/debug/files").to_request();
        let report: ArtifactReport = test::call_and_read_body_json(&app, req).await;
        assert!(!report.model_loaded);
        assert_eq!(report.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(report.files.len(), 2);
        assert!(report.files.iter().all(|f| !f.exists));
        assert_eq!(report.vocabulary_size, None);
    }

    #[actix_web::test]
    async fn test_debug_files_reports_loaded_vocabulary() {
        let app = app!(loaded_service());
        let req = test::TestRequest::get().uri("/debug/files").to_request();
        let report: ArtifactReport = test::call_and_read_body_json(&app, req).await;
        assert!(report.model_loaded);
        assert_eq!(report.vocabulary_size, Some(3));
    }

    #[actix_web::test]
    async fn test_root_and_preflight() {
        let app = app!(loaded_service());

        let req = test::TestRequest::get().uri("/").to_request();
        let root: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(root["endpoints"]["predict"], "/predict");
        assert_eq!(root["model_type"], "logistic");

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/predict")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
    }
}
