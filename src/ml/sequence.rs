// ============================================================
// Layer 5 — Sequence Classifiers (LSTM / CNN)
// ============================================================
// Two small architectures over Keras-style word indices:
//
//   LSTM: Embedding → LSTM → hidden state of the last step
//   CNN:  Embedding → Conv1d → ReLU → global max pool
//
// Both end in a Linear head with `output_units` outputs:
//   1 unit  → sigmoid, a single P(positive)
//   2 units → softmax, [P(negative), P(positive)]
//
// The predictor expands the 1-unit case to [1 - p, p] so the
// adapter always sees a two-class vector.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid, softmax},
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::data::word_index::{pad_sequence, WordIndex};
use crate::domain::error::{LoadError, PredictError};
use crate::domain::traits::TextClassifier;
use crate::ml::check_dims;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceArchitecture {
    Lstm,
    Cnn,
}

#[derive(Config, Debug)]
pub struct SequenceClassifierConfig {
    pub architecture:  SequenceArchitecture,
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    /// LSTM hidden size, or number of CNN filters
    pub hidden_size:   usize,
    #[config(default = 5)]
    pub kernel_size:   usize,
    #[config(default = 1)]
    pub output_units:  usize,
}

impl SequenceClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SequenceClassifier<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let (lstm, conv) = match self.architecture {
            SequenceArchitecture::Lstm => (
                Some(LstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device)),
                None,
            ),
            SequenceArchitecture::Cnn => (
                None,
                Some(Conv1dConfig::new(self.embedding_dim, self.hidden_size, self.kernel_size).init(device)),
            ),
        };
        let head = LinearConfig::new(self.hidden_size, self.output_units).init(device);
        SequenceClassifier { embedding, lstm, conv, head }
    }
}

#[derive(Module, Debug)]
pub struct SequenceClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm:      Option<Lstm<B>>,
    pub conv:      Option<Conv1d<B>>,
    pub head:      Linear<B>,
}

impl<B: Backend> SequenceClassifier<B> {
    /// input_ids: [batch, seq_len] → probabilities: [batch, output_units]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Result<Tensor<B, 2>, PredictError> {
        let x = self.embedding.forward(input_ids); // [batch, seq_len, emb]
        let [batch_size, seq_len, _] = x.dims();

        let features = match (&self.lstm, &self.conv) {
            (Some(lstm), _) => {
                let (output, _state) = lstm.forward(x, None); // [batch, seq_len, hidden]
                let [_, _, hidden] = output.dims();
                output
                    .slice([0..batch_size, seq_len - 1..seq_len, 0..hidden])
                    .reshape([batch_size, hidden])
            }
            (None, Some(conv)) => {
                // Conv1d wants channels first: [batch, emb, seq_len]
                let maps = relu(conv.forward(x.swap_dims(1, 2))); // [batch, filters, len']
                let [_, filters, _] = maps.dims();
                maps.max_dim(2).reshape([batch_size, filters])
            }
            (None, None) => {
                return Err(PredictError::inference(
                    "sequence classifier has neither an LSTM nor a convolution layer",
                ))
            }
        };

        let out = self.head.forward(features);
        let [_, units] = out.dims();
        Ok(if units == 1 { sigmoid(out) } else { softmax(out, 1) })
    }

    /// Restored weights must match `config`: embedding rows and width,
    /// the layer the architecture names, and the head.
    pub fn check_shapes(&self, config: &SequenceClassifierConfig) -> Result<(), LoadError> {
        check_dims(
            "embedding",
            self.embedding.weight.val().dims(),
            [config.vocab_size, config.embedding_dim],
        )?;
        match (config.architecture, &self.lstm, &self.conv) {
            (SequenceArchitecture::Lstm, Some(_), None) => {}
            (SequenceArchitecture::Cnn, None, Some(conv)) => check_dims(
                "convolution",
                conv.weight.val().dims(),
                [config.hidden_size, config.embedding_dim, config.kernel_size],
            )?,
            _ => {
                return Err(LoadError::incompatible(format!(
                    "record layers do not match the {:?} architecture",
                    config.architecture
                )))
            }
        }
        check_dims(
            "output head",
            self.head.weight.val().dims(),
            [config.hidden_size, config.output_units],
        )
    }
}

// ─── Predictor ────────────────────────────────────────────────────────────────
pub struct SequencePredictor<B: Backend> {
    model:       Mutex<SequenceClassifier<B>>,
    word_index:  WordIndex,
    max_seq_len: usize,
    device:      B::Device,
}

impl<B: Backend> SequencePredictor<B> {
    pub fn new(
        model:       SequenceClassifier<B>,
        word_index:  WordIndex,
        max_seq_len: usize,
        device:      B::Device,
    ) -> Self {
        Self { model: Mutex::new(model), word_index, max_seq_len, device }
    }
}

impl<B: Backend> TextClassifier for SequencePredictor<B> {
    fn class_probabilities(&self, text: &str) -> Result<Vec<f64>, PredictError> {
        let sequence = self.word_index.text_to_sequence(text);
        let padded   = pad_sequence(&sequence, self.max_seq_len);

        let ids: Vec<i32> = padded.iter().map(|&x| x as i32).collect();
        let ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device).unsqueeze::<2>();

        let output: Vec<f32> = self
            .model
            .lock()
            .forward(ids)?
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| PredictError::inference(format!("cannot read sequence output: {e:?}")))?;

        match output.as_slice() {
            // Single sigmoid unit: P(positive)
            [p] => {
                let p = f64::from(*p);
                Ok(vec![1.0 - p, p])
            }
            [neg, pos] => Ok(vec![f64::from(*neg), f64::from(*pos)]),
            other => Err(PredictError::inference(format!(
                "sequence model produced {} outputs, expected 1 or 2",
                other.len()
            ))),
        }
    }

    fn vocabulary_size(&self) -> usize {
        self.word_index.word_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tiny_sequence_config, tiny_word_index, TestBackend};

    fn predictor(arch: SequenceArchitecture, units: usize) -> SequencePredictor<TestBackend> {
        let device = Default::default();
        let model  = tiny_sequence_config(arch, units).init::<TestBackend>(&device);
        SequencePredictor::new(model, tiny_word_index(), 16, device)
    }

    #[test]
    fn test_lstm_sigmoid_is_expanded() {
        let probs = predictor(SequenceArchitecture::Lstm, 1)
            .class_probabilities("great flight")
            .unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cnn_softmax_pair() {
        let probs = predictor(SequenceArchitecture::Cnn, 2)
            .class_probabilities("bad delay")
            .unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_all_unknown_words_still_predict() {
        let probs = predictor(SequenceArchitecture::Cnn, 1)
            .class_probabilities("zzz qqq 😀")
            .unwrap();
        assert_eq!(probs.len(), 2);
    }

    #[test]
    fn test_long_input_is_truncated_not_rejected() {
        let text = "great ".repeat(500);
        assert!(predictor(SequenceArchitecture::Lstm, 2)
            .class_probabilities(&text)
            .is_ok());
    }

    #[test]
    fn test_check_shapes() {
        let device = Default::default();
        let config = tiny_sequence_config(SequenceArchitecture::Cnn, 2);
        assert!(config.init::<TestBackend>(&device).check_shapes(&config).is_ok());

        let wider_kernel = tiny_sequence_config(SequenceArchitecture::Cnn, 2)
            .with_kernel_size(5)
            .init::<TestBackend>(&device);
        assert!(matches!(
            wider_kernel.check_shapes(&config),
            Err(LoadError::ArtifactIncompatible(_))
        ));

        let sigmoid_head = tiny_sequence_config(SequenceArchitecture::Cnn, 1).init::<TestBackend>(&device);
        assert!(matches!(
            sigmoid_head.check_shapes(&config),
            Err(LoadError::ArtifactIncompatible(_))
        ));

        let lstm = tiny_sequence_config(SequenceArchitecture::Lstm, 2).init::<TestBackend>(&device);
        assert!(matches!(
            lstm.check_shapes(&config),
            Err(LoadError::ArtifactIncompatible(_))
        ));
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model  = tiny_sequence_config(SequenceArchitecture::Cnn, 2).init::<TestBackend>(&device);
        let ids    = Tensor::<TestBackend, 2, Int>::zeros([4, 16], &device);
        assert_eq!(model.forward(ids).unwrap().dims(), [4, 2]);
    }
}
