use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two inference engines an error or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Fast sequence classifier over vocabulary ids.
    Primary,
    /// Embedding model + anchor similarity matcher.
    Semantic,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Primary => "primary",
            EngineKind::Semantic => "semantic",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by an injected scorer or loader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ScorerError(pub String);

impl ScorerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A single engine could not be loaded.
///
/// The failure is cached by the engine's [`EngineCell`](crate::EngineCell)
/// until it is reset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{engine} engine failed to load: {reason}")]
pub struct LoadError {
    pub engine: EngineKind,
    pub reason: String,
}

/// Errors surfaced by an engine adapter for a single call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine is not loaded and lazy initialization failed.
    #[error("model unavailable: {0}")]
    ModelUnavailable(#[from] LoadError),
    /// The engine is loaded but this call failed. The loaded state is kept.
    #[error("{engine} inference failed: {reason}")]
    Inference { engine: EngineKind, reason: String },
}

impl EngineError {
    pub fn inference(engine: EngineKind, reason: impl Into<String>) -> Self {
        EngineError::Inference {
            engine,
            reason: reason.into(),
        }
    }

    pub fn engine(&self) -> EngineKind {
        match self {
            EngineError::ModelUnavailable(err) => err.engine,
            EngineError::Inference { engine, .. } => *engine,
        }
    }

    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, EngineError::ModelUnavailable(_))
    }
}
