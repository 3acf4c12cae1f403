use thiserror::Error;

/// Errors raised while building or running the semantic encoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g. sequence too short for `[CLS]`/`[SEP]`).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The tokenizer could not be built or failed on an input.
    #[error("tokenizer failure: {0}")]
    Tokenizer(String),
}

/// Reasons an [`AnchorSet`](crate::AnchorSet) is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnchorError {
    #[error("anchor set is empty")]
    Empty,
    #[error("anchor vectors have zero dimension")]
    ZeroDimension,
    #[error("anchor `{label}` has dimension {found}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("anchor `{label}` contains a non-finite component")]
    NonFinite { label: String },
    #[error("duplicate anchor `{0}`")]
    Duplicate(String),
    #[error("invalid anchor json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AnchorError {
    fn from(err: serde_json::Error) -> Self {
        AnchorError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let err = SemanticError::InvalidConfig("max_sequence_length must be >= 3".into());
        assert!(err.to_string().contains("invalid semantic config"));
        assert!(err.to_string().contains(">= 3"));
    }

    #[test]
    fn error_tokenizer() {
        let err = SemanticError::Tokenizer("missing [CLS]".into());
        assert_eq!(err.to_string(), "tokenizer failure: missing [CLS]");
    }

    #[test]
    fn anchor_dimension_mismatch_names_label() {
        let err = AnchorError::DimensionMismatch {
            label: "burn".into(),
            expected: 384,
            found: 3,
        };
        assert_eq!(err.to_string(), "anchor `burn` has dimension 3, expected 384");
    }

    #[test]
    fn anchor_error_from_json() {
        let json_err = serde_json::from_str::<Vec<f32>>("nope").unwrap_err();
        let err: AnchorError = json_err.into();
        assert!(matches!(err, AnchorError::Json(_)));
    }
}
