// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Reads the auxiliary text transforms from disk:
//
//   load_subword_tokenizer — a HuggingFace tokenizer.json
//                            (transformer family)
//   load_json_artifact     — any JsonArtifact: the Keras word
//                            index, the TF-IDF vectorizer, the
//                            logistic coefficients
//
// Both map failures onto the load taxonomy:
//   file absent                 → ArtifactMissing
//   unreadable / unparsable     → ArtifactIncompatible
//   parsed but unusable content → ArtifactIncompatible
//
// Nothing here is ever written back: artifacts are produced
// by the training pipeline, outside this process.
//
// Reference: HuggingFace tokenizers docs (Tokenizer::from_file)
//            Rust Book §9 (Error Handling)

use std::path::Path;
use tokenizers::Tokenizer;

use crate::domain::error::LoadError;
use crate::domain::traits::JsonArtifact;

fn require_file(path: &Path) -> Result<(), LoadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::ArtifactMissing(path.to_path_buf()))
    }
}

/// Load a HuggingFace tokenizer JSON, rejecting one with no vocabulary
pub fn load_subword_tokenizer(path: &Path) -> Result<Tokenizer, LoadError> {
    require_file(path)?;

    let tokenizer = Tokenizer::from_file(path).map_err(|e| {
        LoadError::incompatible(format!(
            "cannot load tokenizer from '{}': {e}", path.display()
        ))
    })?;

    if tokenizer.get_vocab_size(true) == 0 {
        return Err(LoadError::incompatible(format!(
            "tokenizer '{}' has an empty vocabulary", path.display()
        )));
    }

    tracing::info!(
        "Loaded tokenizer from '{}' ({} tokens)",
        path.display(),
        tokenizer.get_vocab_size(true)
    );
    Ok(tokenizer)
}

/// Largest token id the tokenizer can emit; the model's token
/// embedding must have a row for it.
pub fn max_token_id(tokenizer: &Tokenizer) -> u32 {
    tokenizer
        .get_vocab(true)
        .values()
        .copied()
        .max()
        .unwrap_or(0)
}

/// Read, parse and validate one JSON artifact
pub fn load_json_artifact<T: JsonArtifact>(path: &Path) -> Result<T, LoadError> {
    require_file(path)?;

    let json = std::fs::read_to_string(path).map_err(|e| {
        LoadError::incompatible(format!("cannot read '{}': {e}", path.display()))
    })?;

    let artifact: T = serde_json::from_str(&json).map_err(|e| {
        LoadError::incompatible(format!("cannot parse '{}': {e}", path.display()))
    })?;

    artifact.validate()?;
    tracing::debug!("Loaded JSON artifact '{}'", path.display());
    Ok(artifact)
}
