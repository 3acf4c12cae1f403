use std::time::Duration;

use engine::{ClassificationResult, EngineError, LoadError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown to the user whenever no classification can be trusted.
pub const CANNOT_ASSESS_MESSAGE: &str =
    "We could not assess your symptoms. If this may be an emergency, call your local emergency number or seek professional medical help now.";

/// Default confidence the primary result must exceed to skip the fallback.
pub const DEFAULT_PRIMARY_THRESHOLD: f32 = 0.65;

/// Routing policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// A primary result is accepted only when its confidence is strictly
    /// greater than this value.
    pub primary_threshold: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            primary_threshold: DEFAULT_PRIMARY_THRESHOLD,
        }
    }
}

impl RouterConfig {
    pub fn with_primary_threshold(mut self, threshold: f32) -> Self {
        self.primary_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidRouterConfig> {
        if !(0.0..=1.0).contains(&self.primary_threshold) {
            return Err(InvalidRouterConfig(format!(
                "primary_threshold must be within [0, 1], got {}",
                self.primary_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid router config: {0}")]
pub struct InvalidRouterConfig(pub String);

/// States a single routing pass moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterState {
    Idle,
    PrimaryAttempted,
    Accepted,
    FallbackAttempted,
    Resolved,
}

/// Which result the router ended up trusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePath {
    /// Primary was confident enough.
    Primary,
    /// Semantic answered after a weak or failed primary.
    Semantic,
    /// Semantic failed; the weak primary result is returned as-is.
    DegradedPrimary,
}

/// Outcome of one routing pass, with the states it went through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub result: ClassificationResult,
    pub path: RoutePath,
    pub trace: Vec<RouterState>,
}

/// Pre-warming failed for one or both engines.
///
/// Each engine keeps its own cached failure and can be retried after a reset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineInitError {
    #[error("primary engine failed to initialize: {0}")]
    Primary(LoadError),
    #[error("semantic engine failed to initialize: {0}")]
    Semantic(LoadError),
    #[error("both engines failed to initialize (primary: {primary}; semantic: {semantic})")]
    Both {
        primary: LoadError,
        semantic: LoadError,
    },
}

impl EngineInitError {
    pub(crate) fn from_results(
        primary: Result<(), LoadError>,
        semantic: Result<(), LoadError>,
    ) -> Result<(), Self> {
        match (primary, semantic) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(primary), Ok(())) => Err(EngineInitError::Primary(primary)),
            (Ok(()), Err(semantic)) => Err(EngineInitError::Semantic(semantic)),
            (Err(primary), Err(semantic)) => Err(EngineInitError::Both { primary, semantic }),
        }
    }

    pub fn primary_failed(&self) -> bool {
        matches!(self, EngineInitError::Primary(_) | EngineInitError::Both { .. })
    }

    pub fn semantic_failed(&self) -> bool {
        matches!(self, EngineInitError::Semantic(_) | EngineInitError::Both { .. })
    }
}

/// Terminal classification failures. Never carries a label.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassificationError {
    /// Primary produced no usable result and semantic failed.
    #[error("cannot classify: primary ({primary}), semantic ({semantic})")]
    BothEnginesUnavailable {
        primary: EngineError,
        semantic: EngineError,
    },
    /// The caller's deadline elapsed before a result was available.
    ///
    /// Caller-deadline counterpart of an engine inference failure: no label,
    /// no shared state touched, and the same [`user_message`](Self::user_message).
    #[error("classification exceeded its {}ms deadline", .0.as_millis())]
    DeadlineExceeded(Duration),
}

impl ClassificationError {
    /// Generic "cannot assess" text for the end user.
    pub fn user_message(&self) -> &'static str {
        CANNOT_ASSESS_MESSAGE
    }
}
