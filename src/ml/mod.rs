// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All Burn framework code lives here and nowhere else.
//
//   transformer.rs — BERT-style encoder classifier
//                    • token + positional embeddings
//                    • multi-head self-attention with a
//                      padding mask
//                    • [CLS]-position classification head
//
//   sequence.rs    — LSTM / CNN classifiers over Keras-style
//                    word indices, sigmoid or softmax head
//
//   linear.rs      — logistic regression over TF-IDF rows
//                    (plain Rust, no tensors needed)
//
//   adapter.rs     — the closed enum over the three families
//                    and the single normalised `predict`
//
// Backend: NdArray on the CPU by default, Wgpu with the
// `wgpu` feature. Everything else is generic over Backend.
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Transformer encoder sentiment classifier
pub mod transformer;

/// LSTM / CNN sentiment classifiers
pub mod sequence;

/// Logistic regression over TF-IDF features
pub mod linear;

/// Uniform prediction interface across model families
pub mod adapter;

use crate::domain::error::LoadError;

/// A restored parameter must have the shape its config declares.
/// Burn's `load_record` does not check this; a mismatch would only
/// surface as a panic on the first forward pass.
pub(crate) fn check_dims<const D: usize>(
    name:     &str,
    actual:   [usize; D],
    expected: [usize; D],
) -> Result<(), LoadError> {
    if actual == expected {
        Ok(())
    } else {
        Err(LoadError::incompatible(format!(
            "{name} has shape {actual:?} but the config declares {expected:?}"
        )))
    }
}

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;
