use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Sequence length the sentence-embedding model was exported with.
pub const DEFAULT_EMBEDDING_SEQUENCE_LENGTH: usize = 128;

/// Runtime configuration for WordPiece encoding and the embedding call.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig::default().with_max_sequence_length(64);
/// assert!(cfg.add_special_tokens);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Fixed length of `input_ids`, `attention_mask` and `token_type_ids`.
    pub max_sequence_length: usize,
    /// Wrap every input as `[CLS] tokens [SEP]`. Only turn this off for a
    /// model trained without the markers.
    pub add_special_tokens: bool,
    /// Upper bound for a single embedding call, in milliseconds, including
    /// any wait for a non-reentrant scorer to come free.
    pub timeout_ms: Option<u64>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            max_sequence_length: DEFAULT_EMBEDDING_SEQUENCE_LENGTH,
            add_special_tokens: true,
            timeout_ms: None,
        }
    }
}

impl SemanticConfig {
    pub fn with_max_sequence_length(mut self, len: usize) -> Self {
        self.max_sequence_length = len;
        self
    }

    pub fn with_special_tokens(mut self, enabled: bool) -> Self {
        self.add_special_tokens = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Smallest usable sequence: room for one token plus the markers.
    pub fn min_sequence_length(&self) -> usize {
        if self.add_special_tokens {
            3
        } else {
            1
        }
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        let min = self.min_sequence_length();
        if self.max_sequence_length < min {
            return Err(SemanticError::InvalidConfig(format!(
                "max_sequence_length must be >= {min}, got {}",
                self.max_sequence_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.max_sequence_length, 128);
        assert!(cfg.add_special_tokens);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn too_short_for_markers() {
        let cfg = SemanticConfig::default().with_max_sequence_length(2);
        assert!(matches!(cfg.validate(), Err(SemanticError::InvalidConfig(_))));

        let bare = cfg.with_special_tokens(false);
        assert!(bare.validate().is_ok());
        assert!(bare.with_max_sequence_length(0).validate().is_err());
    }

    #[test]
    fn config_yaml_style_partial_json() {
        let cfg: SemanticConfig = serde_json::from_str(r#"{"timeout_ms": 40}"#).unwrap();
        assert_eq!(cfg.max_sequence_length, 128);
        assert_eq!(cfg.timeout(), Some(Duration::from_millis(40)));
    }
}
