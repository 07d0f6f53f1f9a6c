// ============================================================
// Layer 4 — Text Pipeline
// ============================================================
// Everything that happens to a text between the HTTP body
// and the model's native input:
//
//   raw request text
//       │
//       ▼
//   validation   → trim, length / count bounds
//       │
//       ▼
//   one encoder, chosen by the loaded family:
//     subword     → token ids + attention mask (transformer)
//     word_index  → Keras-style word indices   (LSTM / CNN)
//     tfidf       → sparse TF-IDF row          (logistic)
//
// Each module owns exactly one step and is testable without
// any model loaded.
//
// Reference: Rust Book §8 (Strings), §13 (Iterators)

/// Request-level bounds: 1..=280 chars, 1..=100 tweets
pub mod validation;

/// Fixed-length subword encoding via HuggingFace tokenizers
pub mod subword;

/// Keras-compatible word index tokenizer and post-padding
pub mod word_index;

/// scikit-learn-compatible TF-IDF vectorizer
pub mod tfidf;
