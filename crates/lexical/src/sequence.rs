use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::LexicalConfig;
use crate::error::LexicalError;
use crate::normalize::Normalizer;
use crate::vocab::{Vocabulary, PADDING_ID};

/// Fixed-length, post-padded token id sequence fed to the primary classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedSequence {
    ids: Vec<u32>,
}

impl EncodedSequence {
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of leading non-padding slots.
    pub fn token_count(&self) -> usize {
        self.ids.iter().take_while(|&&id| id != PADDING_ID).count()
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.ids
    }
}

impl AsRef<[u32]> for EncodedSequence {
    fn as_ref(&self) -> &[u32] {
        &self.ids
    }
}

/// Maps tokens through `vocab` into a sequence of exactly `max_len` ids.
///
/// The first `max_len` tokens are kept in order starting at index 0; the
/// remaining slots are zero.
pub fn encode_tokens<T: AsRef<str>>(
    tokens: &[T],
    vocab: &Vocabulary,
    max_len: usize,
) -> EncodedSequence {
    let mut ids = Vec::with_capacity(max_len);
    ids.extend(
        tokens
            .iter()
            .take(max_len)
            .map(|token| vocab.lookup(token.as_ref())),
    );
    ids.resize(max_len, PADDING_ID);
    EncodedSequence { ids }
}

/// Normalizer + vocabulary bound to one sequence length.
#[derive(Debug, Clone)]
pub struct SequenceEncoder {
    normalizer: Normalizer,
    vocab: Arc<Vocabulary>,
    max_len: usize,
}

impl SequenceEncoder {
    pub fn new(cfg: &LexicalConfig, vocab: Arc<Vocabulary>) -> Result<Self, LexicalError> {
        cfg.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(cfg),
            vocab,
            max_len: cfg.max_sequence_length,
        })
    }

    pub fn encode_tokens<T: AsRef<str>>(&self, tokens: &[T]) -> EncodedSequence {
        encode_tokens(tokens, &self.vocab, self.max_len)
    }

    /// Normalizes `text` and encodes the resulting tokens.
    pub fn encode_text(&self, text: &str) -> EncodedSequence {
        let tokens = self.normalizer.normalize(text);
        self.encode_tokens(&tokens)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
