//! # Hybrid intent router (`router`)
//!
//! Decides which of the two classification paths to trust for one request.
//!
//! ## Policy
//!
//! ```text
//! Idle → PrimaryAttempted ─┬─ confidence > T_primary ─→ Accepted ──────────→ Resolved
//!                          └─ weak result or failure ─→ FallbackAttempted ─→ Resolved
//! ```
//!
//! - A primary result is accepted only when its confidence is strictly above
//!   [`RouterConfig::primary_threshold`] (default 0.65).
//! - Otherwise the semantic engine is asked and its answer wins whatever its
//!   confidence.
//! - If the semantic engine fails, a weak primary result is still returned
//!   ([`RoutePath::DegradedPrimary`]).
//! - Only when neither engine produced anything does routing fail, with
//!   [`ClassificationError::BothEnginesUnavailable`].
//!
//! Stage failures never escape on their own; they only steer the state
//! machine. Every pass records the states it visited in
//! [`RouteDecision::trace`].
//!
//! ## Engines
//!
//! The router talks to both paths through [`IntentEngine`], implemented for
//! `classifier::PrimaryClassifier` and `semantic::SemanticMatcher`. Each keeps
//! its own lazily loaded model; [`Router::warm_up`] loads both concurrently
//! and reports failures per engine.

pub mod engine;
pub mod engines;
pub mod types;

pub use crate::engine::Router;
pub use crate::engines::IntentEngine;
pub use crate::types::{
    ClassificationError, EngineInitError, InvalidRouterConfig, RouteDecision, RoutePath,
    RouterConfig, RouterState, CANNOT_ASSESS_MESSAGE, DEFAULT_PRIMARY_THRESHOLD,
};
