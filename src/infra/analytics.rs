// ============================================================
// Layer 6 — Analytics Sink (PostHog)
// ============================================================
// Forwards feedback events to PostHog's capture endpoint:
//
//   POST {host}/capture/
//   {
//     "api_key":     "...",
//     "event":       "prediction_feedback",
//     "distinct_id": "user_<uuid>",
//     "properties":  { FeedbackEvent },
//     "timestamp":   "<RFC 3339>"
//   }
//
// One attempt per event. Failures are returned to the caller
// so the user sees them; nothing is queued or retried.
//
// Reference: PostHog capture API docs

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::error::FeedbackError;
use crate::domain::feedback::FeedbackEvent;
use crate::domain::traits::FeedbackSink;

pub const DEFAULT_POSTHOG_HOST: &str = "https://app.posthog.com";
pub const FEEDBACK_EVENT: &str = "prediction_feedback";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PosthogConfig {
    /// None or empty → the sink reports NotConfigured
    pub api_key: Option<String>,
    pub host:    String,
}

impl Default for PosthogConfig {
    fn default() -> Self {
        Self { api_key: None, host: DEFAULT_POSTHOG_HOST.to_string() }
    }
}

#[derive(Serialize)]
struct CaptureRequest<'a> {
    api_key:     &'a str,
    event:       &'a str,
    distinct_id: &'a str,
    properties:  &'a FeedbackEvent,
    timestamp:   &'a str,
}

pub struct PosthogSink {
    config:      PosthogConfig,
    client:      reqwest::Client,
    /// One anonymous id per client session
    distinct_id: String,
}

impl PosthogSink {
    pub fn new(config: PosthogConfig) -> Result<Self, FeedbackError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FeedbackError::Delivery(e.to_string()))?;
        Ok(Self {
            config,
            client,
            distinct_id: format!("user_{}", Uuid::new_v4().simple()),
        })
    }

    pub fn distinct_id(&self) -> &str {
        &self.distinct_id
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn capture_url(&self) -> String {
        format!("{}/capture/", self.config.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl FeedbackSink for PosthogSink {
    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    async fn send(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        let api_key = self.api_key().ok_or(FeedbackError::NotConfigured)?;

        let body = CaptureRequest {
            api_key,
            event:       FEEDBACK_EVENT,
            distinct_id: &self.distinct_id,
            properties:  event,
            timestamp:   &event.timestamp,
        };

        let response = self
            .client
            .post(self.capture_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("PostHog delivery failed: {e}");
                FeedbackError::Delivery(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("PostHog rejected feedback event: HTTP {}", status.as_u16());
            return Err(FeedbackError::Rejected(status.as_u16()));
        }

        tracing::info!(
            "Feedback sent for {}: {} → {} ({})",
            self.distinct_id(),
            event.predicted_sentiment,
            event.actual_sentiment,
            event.model_type
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::Sentiment;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

    /// Local stand-in for PostHog that records bodies and answers `status`.
    fn mock_posthog(status: u16) -> (String, Captured, actix_web::dev::ServerHandle) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let server = HttpServer::new(move || {
            let sink = sink.clone();
            App::new().route(
                "/capture/",
                web::post().to(move |body: web::Json<serde_json::Value>| {
                    let sink = sink.clone();
                    async move {
                        sink.lock().push(body.into_inner());
                        HttpResponse::build(
                            actix_web::http::StatusCode::from_u16(status).unwrap(),
                        )
                        .json(serde_json::json!({"status": 1}))
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (format!("http://{addr}"), captured, handle)
    }

    fn event() -> FeedbackEvent {
        FeedbackEvent::incorrect_prediction(
            "the crew was lovely", Sentiment::Negative, Sentiment::Positive, 0.64, "logistic", "test",
        )
    }

    #[test]
    fn test_unconfigured_without_key() {
        let sink = PosthogSink::new(PosthogConfig::default()).unwrap();
        assert!(!sink.is_configured());

        let blank = PosthogSink::new(PosthogConfig { api_key: Some("  ".into()), ..Default::default() }).unwrap();
        assert!(!blank.is_configured());
    }

    #[test]
    fn test_distinct_id_shape() {
        let sink = PosthogSink::new(PosthogConfig::default()).unwrap();
        assert!(sink.distinct_id().starts_with("user_"));
        assert_eq!(sink.distinct_id().len(), "user_".len() + 32);
    }

    #[actix_web::test]
    async fn test_send_without_key_fails_fast() {
        let sink = PosthogSink::new(PosthogConfig::default()).unwrap();
        assert!(matches!(sink.send(&event()).await, Err(FeedbackError::NotConfigured)));
    }

    #[actix_web::test]
    async fn test_capture_body() {
        let (host, captured, handle) = mock_posthog(200);
        let sink = PosthogSink::new(PosthogConfig { api_key: Some("phc_test".into()), host: format!("{host}/") }).unwrap();

        sink.send(&event()).await.unwrap();
        handle.stop(true).await;

        let bodies = captured.lock();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["api_key"], "phc_test");
        assert_eq!(body["event"], FEEDBACK_EVENT);
        assert_eq!(body["distinct_id"], sink.distinct_id());
        assert_eq!(body["properties"]["feedback_type"], "incorrect_prediction");
        assert_eq!(body["properties"]["predicted_sentiment"], "Négatif");
        assert_eq!(body["properties"]["actual_sentiment"], "Positif");
        assert_eq!(body["timestamp"], body["properties"]["timestamp"]);
    }

    #[actix_web::test]
    async fn test_non_success_is_rejected_once() {
        let (host, captured, handle) = mock_posthog(401);
        let sink = PosthogSink::new(PosthogConfig { api_key: Some("bad".into()), host }).unwrap();

        assert!(matches!(sink.send(&event()).await, Err(FeedbackError::Rejected(401))));
        handle.stop(true).await;
        assert_eq!(captured.lock().len(), 1);
    }

    #[actix_web::test]
    async fn test_unreachable_host_is_delivery_error() {
        let sink = PosthogSink::new(PosthogConfig {
            api_key: Some("phc_test".into()),
            host:    "http://127.0.0.1:9".into(),
        })
        .unwrap();
        assert!(matches!(sink.send(&event()).await, Err(FeedbackError::Delivery(_))));
    }
}
