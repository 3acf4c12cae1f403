//! Configuration for the lexical stage.
//!
//! [`LexicalConfig`] controls both halves of the stage: how raw symptom text
//! is cleaned into word tokens, and how long the encoded sequence handed to
//! the primary classifier is.
//!
//! The defaults match the preprocessing the deployed classifier was trained
//! with. Changing any of them for a model that was not retrained against the
//! new settings silently degrades accuracy, so treat the config as part of
//! the model artifact.
//!
//! # Examples
//!
//! ```rust
//! use lexical::LexicalConfig;
//!
//! let config = LexicalConfig::default();
//! assert_eq!(config.max_sequence_length, 15);
//! assert!(config.stop_words.iter().any(|w| w == "please"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LexicalError;

/// Conversational filler removed before encoding.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "help", "i", "think", "got", "my", "me", "the", "a", "an", "please", "somebody", "do", "does",
    "is", "am", "are",
];

/// Sequence length the primary classifier was exported with.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 15;

/// Configuration for the lexical normalizer and sequence encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LexicalConfig {
    /// Apply Unicode NFKC normalization before lower-casing.
    pub normalize_unicode: bool,
    /// Reduce each token to its singular form.
    pub singularize: bool,
    /// Words dropped after punctuation stripping. Compared after lower-casing.
    pub stop_words: Vec<String>,
    /// Fixed length `L` of every [`EncodedSequence`](crate::EncodedSequence).
    pub max_sequence_length: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            singularize: true,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl LexicalConfig {
    pub fn with_max_sequence_length(mut self, len: usize) -> Self {
        self.max_sequence_length = len;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_singularize(mut self, singularize: bool) -> Self {
        self.singularize = singularize;
        self
    }

    /// Rejects settings that cannot produce a usable encoder.
    pub fn validate(&self) -> Result<(), LexicalError> {
        if self.max_sequence_length == 0 {
            return Err(LexicalError::InvalidConfig(
                "max_sequence_length must be >= 1".into(),
            ));
        }
        if let Some(word) = self.stop_words.iter().find(|w| w.trim().is_empty()) {
            return Err(LexicalError::InvalidConfig(format!(
                "stop word {word:?} is blank"
            )));
        }
        Ok(())
    }
}
