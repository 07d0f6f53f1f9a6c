// ============================================================
// Layer 6 — API Client
// ============================================================
// The dashboard side of the HTTP API. Used by the `status`,
// `review` and `batch` commands to talk to a running server.
//
//   health()        GET  /health          (5 s)
//   predict()       POST /predict         (10 s)
//   predict_batch() POST /predict/batch   (30 s)
//
// Non-2xx answers keep the server's `detail` so the user sees
// e.g. "Model not loaded" rather than a bare status code.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::wire::{
    BatchPredictionOutput, ErrorDetail, HealthResponse, PredictionOutput, TweetBatchInput,
    TweetInput,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const HEALTH_TIMEOUT:  Duration = Duration::from_secs(5);
const PREDICT_TIMEOUT: Duration = Duration::from_secs(10);
const BATCH_TIMEOUT:   Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Error {status}: {detail}")]
    Api { status: u16, detail: String },
}

pub struct ApiClient {
    base_url: String,
    client:   reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn predict(&self, text: &str) -> Result<PredictionOutput, ClientError> {
        let response = self
            .client
            .post(self.url("/predict"))
            .timeout(PREDICT_TIMEOUT)
            .json(&TweetInput { text: text.to_string() })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn predict_batch(&self, tweets: &[String]) -> Result<BatchPredictionOutput, ClientError> {
        let response = self
            .client
            .post(self.url("/predict/batch"))
            .timeout(BATCH_TIMEOUT)
            .json(&TweetBatchInput { tweets: tweets.to_vec() })
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await?;
    let detail = serde_json::from_str::<ErrorDetail>(&body)
        .map(|e| e.detail)
        .unwrap_or(body);
    tracing::debug!("API answered {}: {}", status.as_u16(), detail);
    Err(ClientError::Api { status: status.as_u16(), detail })
}
