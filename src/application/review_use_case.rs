// ============================================================
// Layer 2 — Review Use Case (dashboard side)
// ============================================================
// What a dashboard user does, without the dashboard:
//
//   status()  → is the API up, is a model loaded?
//   review()  → predict one tweet; if the user says the real
//               sentiment differs, forward one feedback event
//   batch()   → predict many tweets and summarise the split
//
// Feedback goes out at most once per correction. A missing
// API key or a failed delivery is reported in the outcome,
// never retried.

use anyhow::{Context, Result};

use crate::domain::error::FeedbackError;
use crate::domain::feedback::FeedbackEvent;
use crate::domain::prediction::Sentiment;
use crate::domain::traits::FeedbackSink;
use crate::domain::wire::{BatchPredictionOutput, HealthResponse, PredictionOutput};
use crate::infra::api_client::ApiClient;

/// `source` stamped on every feedback event sent from here
pub const REVIEW_SOURCE: &str = "review_cli";

#[derive(Debug)]
pub enum FeedbackOutcome {
    /// The user gave no actual sentiment
    NotRequested,
    /// The user agreed with the prediction
    Confirmed,
    Sent,
    Failed(FeedbackError),
}

#[derive(Debug)]
pub struct Review {
    pub prediction: PredictionOutput,
    pub predicted:  Sentiment,
    pub feedback:   FeedbackOutcome,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub output:          BatchPredictionOutput,
    pub positive:        usize,
    pub negative:        usize,
    pub mean_confidence: f64,
}

pub struct ReviewUseCase {
    client: ApiClient,
    sink:   Box<dyn FeedbackSink>,
}

impl ReviewUseCase {
    pub fn new(client: ApiClient, sink: Box<dyn FeedbackSink>) -> Self {
        Self { client, sink }
    }

    pub fn feedback_configured(&self) -> bool {
        self.sink.is_configured()
    }

    pub async fn status(&self) -> Result<HealthResponse> {
        self.client
            .health()
            .await
            .with_context(|| format!("Cannot reach the API at {}", self.client.base_url()))
    }

    pub async fn review(&self, text: &str, actual: Option<Sentiment>) -> Result<Review> {
        let prediction = self
            .client
            .predict(text)
            .await
            .with_context(|| format!("Prediction request to {} failed", self.client.base_url()))?;

        let predicted = prediction
            .sentiment
            .parse::<usize>()
            .ok()
            .and_then(Sentiment::from_index)
            .with_context(|| {
                format!("API returned an unknown sentiment code '{}'", prediction.sentiment)
            })?;

        let feedback = match actual {
            None                        => FeedbackOutcome::NotRequested,
            Some(a) if a == predicted   => FeedbackOutcome::Confirmed,
            Some(a)                     => self.send_correction(&prediction, predicted, a).await,
        };

        Ok(Review { prediction, predicted, feedback })
    }

    async fn send_correction(
        &self,
        prediction: &PredictionOutput,
        predicted:  Sentiment,
        actual:     Sentiment,
    ) -> FeedbackOutcome {
        if !self.sink.is_configured() {
            return FeedbackOutcome::Failed(FeedbackError::NotConfigured);
        }

        let event = FeedbackEvent::incorrect_prediction(
            &prediction.text,
            predicted,
            actual,
            prediction.confidence,
            prediction.model_type.clone(),
            REVIEW_SOURCE,
        );

        match self.sink.send(&event).await {
            Ok(())  => FeedbackOutcome::Sent,
            Err(e)  => FeedbackOutcome::Failed(e),
        }
    }

    pub async fn batch(&self, tweets: &[String]) -> Result<BatchSummary> {
        let output = self
            .client
            .predict_batch(tweets)
            .await
            .with_context(|| format!("Batch request to {} failed", self.client.base_url()))?;

        let positive = output
            .predictions
            .iter()
            .filter(|p| p.sentiment == Sentiment::Positive.code())
            .count();
        let negative = output.predictions.len() - positive;
        let mean_confidence = if output.predictions.is_empty() {
            0.0
        } else {
            output.predictions.iter().map(|p| p.confidence).sum::<f64>()
                / output.predictions.len() as f64
        };

        Ok(BatchSummary { output, positive, negative, mean_confidence })
    }
}
