// ============================================================
// Layer 5 — Prediction Adapter
// ============================================================
// One call signature over three model families:
//
//   predict(text) → PredictionResult
//
// The family is fixed when the artifact is loaded; there is
// no per-request mixing. Each variant produces a raw class
// probability vector, then every path shares the same
// normalisation (argmax, confidence, {negative, positive}).
//
// Input is assumed validated (trimmed, non-empty) upstream.

use burn::prelude::Backend;

use crate::domain::error::PredictError;
use crate::domain::model_kind::ModelFamily;
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::TextClassifier;
use crate::ml::linear::LinearPredictor;
use crate::ml::sequence::SequencePredictor;
use crate::ml::transformer::TransformerPredictor;
use crate::ml::InferBackend;

pub enum PredictionAdapter<B: Backend = InferBackend> {
    Transformer(TransformerPredictor<B>),
    Sequence(SequencePredictor<B>),
    Linear(LinearPredictor),
}

impl<B: Backend> PredictionAdapter<B> {
    pub fn family(&self) -> ModelFamily {
        match self {
            PredictionAdapter::Transformer(_) => ModelFamily::TransformerClassifier,
            PredictionAdapter::Sequence(_)    => ModelFamily::SequenceClassifier,
            PredictionAdapter::Linear(_)      => ModelFamily::LinearClassifier,
        }
    }

    fn classifier(&self) -> &dyn TextClassifier {
        match self {
            PredictionAdapter::Transformer(p) => p,
            PredictionAdapter::Sequence(p)    => p,
            PredictionAdapter::Linear(p)      => p,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.classifier().vocabulary_size()
    }

    pub fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        let probabilities = self.classifier().class_probabilities(text)?;
        let result = PredictionResult::from_probabilities(&probabilities)?;
        tracing::debug!(
            "{:?} → class {} (confidence {:.4})",
            self.family(),
            result.predicted_class.index(),
            result.confidence
        );
        Ok(result)
    }
}
