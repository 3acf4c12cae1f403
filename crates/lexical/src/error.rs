use thiserror::Error;

/// Errors raised while building lexical components.
///
/// Normalizing and encoding text never fail; only construction-time
/// validation of configs and vocabularies does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),
    #[error("vocabulary json could not be parsed: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LexicalError {
    fn from(err: serde_json::Error) -> Self {
        LexicalError::Json(err.to_string())
    }
}
