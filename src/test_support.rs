// ============================================================
// Shared test fixtures
// ============================================================
// Tiny, deterministic artifacts for unit tests: a word-level
// HuggingFace tokenizer, small burn configs, a Keras word
// index, a fitted TF-IDF + logistic pair, and writers that put
// each family's artifact files on disk the way the training
// pipeline lays them out.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
};
use tokenizers::Tokenizer;

use crate::data::tfidf::{Norm, TfidfParams, TfidfVectorizer, SKLEARN_TOKEN_PATTERN};
use crate::data::word_index::{WordIndex, KERAS_FILTERS};
use crate::infra::artifact_store::record_extension;
use crate::ml::linear::{LinearPredictor, LogisticRegression};
use crate::ml::sequence::{SequenceArchitecture, SequenceClassifierConfig};
use crate::ml::transformer::TransformerClassifierConfig;

pub type TestBackend = burn::backend::NdArray;

/// Intercept for which an empty TF-IDF row gives predict_proba = [0.3, 0.7]
pub fn p07_intercept() -> f64 {
    (0.7f64 / 0.3).ln()
}

// ─── Subword tokenizer ────────────────────────────────────────────────────────
/// BERT-convention ids: [PAD]=0, [UNK]=1, [CLS]=101, [SEP]=102,
/// [MASK]=103, then one id per word from 104.
pub fn word_level_tokenizer_json(words: &[&str]) -> serde_json::Value {
    let mut vocab = serde_json::json!({
        "[PAD]":  0,
        "[UNK]":  1,
        "[CLS]":  101,
        "[SEP]":  102,
        "[MASK]": 103,
    });
    for (i, word) in words.iter().enumerate() {
        vocab[*word] = serde_json::json!(104 + i);
    }

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", 102],
            "cls": ["[CLS]", 101]
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    })
}

pub fn word_level_tokenizer(words: &[&str]) -> Tokenizer {
    Tokenizer::from_str(&word_level_tokenizer_json(words).to_string()).unwrap()
}

// ─── Neural configs ───────────────────────────────────────────────────────────
pub fn tiny_transformer_config(vocab_size: usize) -> TransformerClassifierConfig {
    TransformerClassifierConfig::new(vocab_size, 16, 16, 2, 1, 32)
}

pub fn tiny_sequence_config(arch: SequenceArchitecture, units: usize) -> SequenceClassifierConfig {
    SequenceClassifierConfig::new(arch, 16, 8, 8)
        .with_kernel_size(3)
        .with_output_units(units)
}

fn tiny_word_index_map() -> HashMap<String, u32> {
    [("great", 1), ("flight", 2), ("bad", 3), ("delay", 4)]
        .into_iter()
        .map(|(w, i)| (w.to_string(), i))
        .collect()
}

pub fn tiny_word_index() -> WordIndex {
    WordIndex {
        word_index: tiny_word_index_map(),
        num_words:  None,
        oov_token:  None,
        lower:      true,
        filters:    KERAS_FILTERS.to_string(),
        split:      " ".to_string(),
    }
}

// ─── Linear artifacts ─────────────────────────────────────────────────────────
fn linear_vocabulary() -> HashMap<String, usize> {
    // Deliberately disjoint from "This is an amazing product! I love it!"
    [("great", 0), ("delay", 1), ("rude", 2)]
        .into_iter()
        .map(|(w, i)| (w.to_string(), i))
        .collect()
}

const LINEAR_IDF:  [f64; 3] = [1.5, 1.2, 2.0];
const LINEAR_COEF: [f64; 3] = [2.0, -2.0, -1.5];

pub fn linear_artifacts(intercept: f64) -> (TfidfVectorizer, LogisticRegression) {
    let params = TfidfParams {
        vocabulary:    linear_vocabulary(),
        idf:           LINEAR_IDF.to_vec(),
        ngram_range:   (1, 1),
        lowercase:     true,
        sublinear_tf:  false,
        norm:          Some(Norm::L2),
        token_pattern: SKLEARN_TOKEN_PATTERN.to_string(),
    };
    let model = LogisticRegression {
        coef:      LINEAR_COEF.to_vec(),
        intercept,
        classes:   Some(vec![0, 1]),
    };
    (TfidfVectorizer::new(params).unwrap(), model)
}

/// A linear predictor whose weight for "rude" is NaN. It never
/// comes out of the loader (validate() rejects it) but stands in
/// for a model that fails at inference time.
pub fn nan_weight_linear() -> LinearPredictor {
    let (vectorizer, mut model) = linear_artifacts(0.0);
    model.coef[2] = f64::NAN;
    LinearPredictor::new(vectorizer, model).unwrap()
}

// ─── On-disk writers ──────────────────────────────────────────────────────────
fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Writes `logistic_regression_model.json` and `tfidf_vectorizer.json`
/// into `dir`; returns the model path.
pub fn write_linear_artifacts(dir: &Path, intercept: f64) -> PathBuf {
    write_json(
        &dir.join("tfidf_vectorizer.json"),
        &serde_json::json!({
            "vocabulary":   linear_vocabulary(),
            "idf":          LINEAR_IDF,
            "ngram_range":  [1, 1],
            "lowercase":    true,
            "sublinear_tf": false,
            "norm":         "l2",
        }),
    );
    let model_path = dir.join("logistic_regression_model.json");
    write_json(
        &model_path,
        &serde_json::json!({
            "coef":      LINEAR_COEF,
            "intercept": intercept,
            "classes":   [0, 1],
        }),
    );
    model_path
}

/// Writes `<arch>_model.<ext>`, `<arch>_model_config.json` and
/// `<arch>_model_tokenizer.json` into `dir`; returns the record path.
pub fn write_sequence_artifacts(dir: &Path, arch: SequenceArchitecture, units: usize) -> PathBuf {
    let name   = match arch {
        SequenceArchitecture::Lstm => "lstm_model",
        SequenceArchitecture::Cnn  => "cnn_model",
    };
    let stem   = dir.join(name);
    let config = tiny_sequence_config(arch, units);

    std::fs::write(
        dir.join(format!("{name}_config.json")),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
    write_json(
        &dir.join(format!("{name}_tokenizer.json")),
        &serde_json::json!({ "word_index": tiny_word_index_map(), "lower": true }),
    );

    let device = Default::default();
    let model  = config.init::<TestBackend>(&device);
    CompactRecorder::new()
        .record(model.into_record(), stem.clone())
        .unwrap();

    dir.join(format!("{name}.{}", record_extension()))
}

/// Writes `model.<ext>`, `config.json` and `tokenizer.json` into
/// `dir`; returns `dir`.
pub fn write_transformer_artifacts(dir: &Path) -> PathBuf {
    let config = TransformerClassifierConfig::new(128, 128, 16, 2, 1, 32);
    std::fs::write(
        dir.join("config.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
    write_json(
        &dir.join("tokenizer.json"),
        &word_level_tokenizer_json(&["great", "flight", "bad", "delay"]),
    );

    let device = Default::default();
    let model  = config.init::<TestBackend>(&device);
    CompactRecorder::new()
        .record(model.into_record(), dir.join("model"))
        .unwrap();

    dir.to_path_buf()
}
