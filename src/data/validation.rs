// ============================================================
// Layer 4 — Request Validation
// ============================================================
// Nothing reaches a model unless it passes here.
//
// Single text:
//   1. trim surrounding whitespace
//   2. 1 ≤ chars ≤ 280   (chars = Unicode scalar values)
//   An all-whitespace text of any length is "empty".
//
// Batch:
//   1. 1 ≤ raw item count ≤ 100
//   2. trim every item, drop the ones that become empty
//   3. at least one item must survive
//   Order of surviving items is preserved.

use crate::domain::error::PredictError;

pub const MIN_TEXT_CHARS: usize = 1;
pub const MAX_TEXT_CHARS: usize = 280;
pub const MIN_BATCH_ITEMS: usize = 1;
pub const MAX_BATCH_ITEMS: usize = 100;

/// Returns the trimmed text, or a ValidationError.
pub fn validate_text(text: &str) -> Result<&str, PredictError> {
    let trimmed = text.trim();
    let chars   = trimmed.chars().count();

    if chars < MIN_TEXT_CHARS {
        return Err(PredictError::validation("Text cannot be empty"));
    }
    if chars > MAX_TEXT_CHARS {
        return Err(PredictError::validation(format!(
            "Text must be at most {MAX_TEXT_CHARS} characters (got {chars})"
        )));
    }
    Ok(trimmed)
}

/// Returns the trimmed, non-empty items in input order.
pub fn validate_batch<S: AsRef<str>>(texts: &[S]) -> Result<Vec<&str>, PredictError> {
    if texts.len() < MIN_BATCH_ITEMS {
        return Err(PredictError::validation("Tweet list cannot be empty"));
    }
    if texts.len() > MAX_BATCH_ITEMS {
        return Err(PredictError::validation(format!(
            "At most {MAX_BATCH_ITEMS} tweets per request (got {})",
            texts.len()
        )));
    }

    let kept: Vec<&str> = texts
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();

    if kept.is_empty() {
        return Err(PredictError::validation("Every tweet in the list is empty"));
    }
    Ok(kept)
}
