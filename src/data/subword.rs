// ============================================================
// Layer 4 — Subword Encoder (transformer family)
// ============================================================
// Turns a text into exactly `max_len` token ids plus an
// attention mask, the shape the transformer was trained on:
//
//   [CLS] tok tok tok ... [SEP] [PAD] [PAD] ...
//     1    1   1   1      1     0     0
//
// Over-long input is truncated, never rejected. When the
// tokenizer's post-processor closes the sequence with a
// special token ([SEP]) that token is kept in the last slot.
//
// Unknown words and emoji are the tokenizer's business: they
// become [UNK] or byte-level pieces depending on the vocab.
//
// Reference: HuggingFace tokenizers docs (Encoding)

use tokenizers::Tokenizer;

use crate::domain::error::PredictError;

/// Fixed encoding length shared by the transformer and sequence families
pub const MAX_SEQ_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
}

pub struct SubwordEncoder {
    tokenizer: Tokenizer,
    max_len:   usize,
    pad_id:    u32,
}

impl SubwordEncoder {
    pub fn new(tokenizer: Tokenizer, max_len: usize) -> Self {
        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);
        Self { tokenizer, max_len: max_len.max(1), pad_id }
    }

    /// Tokens known to the tokenizer, added tokens included
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    pub fn encode(&self, text: &str) -> Result<EncodedText, PredictError> {
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| PredictError::inference(format!("tokenisation failed: {e}")))?;

        let mut input_ids      = enc.get_ids().to_vec();
        let mut attention_mask = enc.get_attention_mask().to_vec();

        if input_ids.len() > self.max_len {
            let closing = match enc.get_special_tokens_mask().last() {
                Some(&1) => input_ids.last().copied(),
                _        => None,
            };
            input_ids.truncate(self.max_len);
            attention_mask.truncate(self.max_len);
            if let Some(id) = closing {
                input_ids[self.max_len - 1] = id;
            }
        }

        input_ids.resize(self.max_len, self.pad_id);
        attention_mask.resize(self.max_len, 0);

        Ok(EncodedText { input_ids, attention_mask })
    }
}
