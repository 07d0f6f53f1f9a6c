// ============================================================
// Layer 5 — Transformer Classifier
// ============================================================
// BERT-shaped encoder with a two-class head:
//
//   ids  → token embedding + position embedding
//        → N × [self-attention → add & norm → GELU FFN → add & norm]
//        → final norm
//        → hidden state at position 0 ([CLS])
//        → Linear(d_model, 2) → softmax
//
// Padding positions (attention_mask == 0) are masked out of
// every attention layer, so [PAD] never influences [CLS].
//
// Reference: Devlin et al. (2019) BERT, Burn Book §3

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::softmax,
};
use parking_lot::Mutex;

use crate::data::subword::SubwordEncoder;
use crate::domain::error::{LoadError, PredictError};
use crate::domain::traits::TextClassifier;
use crate::ml::check_dims;

/// Saved as `config.json` next to the record; the loader rebuilds
/// the module from it before restoring the weights.
#[derive(Config, Debug)]
pub struct TransformerClassifierConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    #[config(default = 2)]
    pub num_classes: usize,
    #[config(default = 0.0)]
    pub dropout:     f64,
}

impl TransformerClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerClassifier<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let classifier = LinearConfig::new(self.d_model, self.num_classes).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        TransformerClassifier {
            token_embedding, position_embedding, layers,
            final_norm, classifier, dropout,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// `mask_pad` is true where the position is padding.
    pub fn forward(&self, x: Tensor<B, 3>, mask_pad: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let input = MhaInput::self_attn(x.clone()).mask_pad(mask_pad);
        let attn_output = self.self_attn.forward(input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct TransformerClassifier<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub classifier:         Linear<B>,
    pub dropout:            Dropout,
}

impl<B: Backend> TransformerClassifier<B> {
    /// input_ids, attention_mask: [batch, seq_len] → logits: [batch, num_classes]
    pub fn forward(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();
        let mask_pad = attention_mask.equal_elem(0);

        let tok_emb = self.token_embedding.forward(input_ids);

        // Learned absolute positions 0..seq_len, one row per slot
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for layer in &self.layers {
            x = layer.forward(x, mask_pad.clone());
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]
        let [_, _, d_model] = x.dims();

        // Sentence representation = the [CLS] slot at position 0.
        let cls = x
            .slice([0..batch_size, 0..1, 0..d_model])
            .reshape([batch_size, d_model]);
        self.classifier.forward(cls)
    }

    /// Restored weights must match `config` layer by layer.
    pub fn check_shapes(&self, config: &TransformerClassifierConfig) -> Result<(), LoadError> {
        let d = config.d_model;
        check_dims("token embedding", self.token_embedding.weight.val().dims(), [config.vocab_size, d])?;
        check_dims("position embedding", self.position_embedding.weight.val().dims(), [config.max_seq_len, d])?;
        if self.layers.len() != config.num_layers {
            return Err(LoadError::incompatible(format!(
                "record has {} encoder layers but the config declares {}",
                self.layers.len(),
                config.num_layers
            )));
        }
        for layer in &self.layers {
            check_dims("feed-forward input", layer.ffn_linear1.weight.val().dims(), [d, config.d_ff])?;
            check_dims("feed-forward output", layer.ffn_linear2.weight.val().dims(), [config.d_ff, d])?;
        }
        check_dims("classifier head", self.classifier.weight.val().dims(), [d, config.num_classes])
    }
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// Encoder + model behind a single-slot gate. Burn modules are
/// Send but not Sync, so concurrent callers take turns.
pub struct TransformerPredictor<B: Backend> {
    model:   Mutex<TransformerClassifier<B>>,
    encoder: SubwordEncoder,
    device:  B::Device,
}

impl<B: Backend> TransformerPredictor<B> {
    pub fn new(model: TransformerClassifier<B>, encoder: SubwordEncoder, device: B::Device) -> Self {
        Self { model: Mutex::new(model), encoder, device }
    }
}

impl<B: Backend> TextClassifier for TransformerPredictor<B> {
    fn class_probabilities(&self, text: &str) -> Result<Vec<f64>, PredictError> {
        let encoded = self.encoder.encode(text)?;

        let ids: Vec<i32>  = encoded.input_ids.iter().map(|&x| x as i32).collect();
        let mask: Vec<i32> = encoded.attention_mask.iter().map(|&x| x as i32).collect();
        let ids  = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device).unsqueeze::<2>();
        let mask = Tensor::<B, 1, Int>::from_ints(mask.as_slice(), &self.device).unsqueeze::<2>();

        let logits = self.model.lock().forward(ids, mask);
        let probs: Vec<f32> = softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| PredictError::inference(format!("cannot read transformer output: {e:?}")))?;

        tracing::debug!("Transformer probabilities: {:?}", probs);
        Ok(probs.into_iter().map(f64::from).collect())
    }

    fn vocabulary_size(&self) -> usize {
        self.encoder.vocab_size()
    }
}
