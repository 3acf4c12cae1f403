use thiserror::Error;

/// Errors raised while loading knowledge tables or validating their config.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KnowledgeError {
    #[error("invalid protocol table json: {0}")]
    Json(String),
    #[error("protocol table contains a blank label")]
    BlankLabel,
    #[error("protocol `{0}` has an empty title")]
    EmptyTitle(String),
    #[error("protocol `{0}` has no steps")]
    EmptySteps(String),
    #[error("safety_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),
}

impl From<serde_json::Error> for KnowledgeError {
    fn from(err: serde_json::Error) -> Self {
        KnowledgeError::Json(err.to_string())
    }
}
