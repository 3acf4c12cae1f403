//! Primary path of symptom intent classification.
//!
//! [`PrimaryClassifier`] wraps the injected fast sequence classifier: text is
//! normalized and encoded by the lexical stage, scored by the black-box
//! [`PrimaryScorer`](engine::PrimaryScorer), and the arg-max score is mapped
//! back through the [`LabelSet`] the model was exported with.
//!
//! The scorer is loaded lazily on first use. Concurrent first callers share a
//! single load attempt and its outcome, success or failure, is cached until
//! [`PrimaryClassifier::reset`].

mod adapter;
mod config;
mod labels;

pub use crate::adapter::{argmax, PrimaryClassifier};
pub use crate::config::ClassifierConfig;
pub use crate::labels::{LabelError, LabelSet};
