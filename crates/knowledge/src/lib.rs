//! Confidence-gated first-aid guidance (`knowledge`).
//!
//! Two read-only lookups sit at the end of the triage pipeline:
//!
//! - [`KnowledgeGate::lookup`] releases a [`Protocol`] only when the winning
//!   confidence reaches the safety threshold (default
//!   [`DEFAULT_SAFETY_THRESHOLD`]) and the label has an entry in the
//!   [`ProtocolTable`].
//! - [`TriageMapper::level`] maps any label to a [`TriageLevel`], falling back
//!   to `Routine` for labels it does not know.
//!
//! ```
//! use std::sync::Arc;
//! use knowledge::{KnowledgeGate, ProtocolTable, TriageLevel, TriageMapper};
//!
//! let gate = KnowledgeGate::new(Arc::new(ProtocolTable::builtin()?), 0.65)?;
//! assert!(gate.lookup("chest_pain", 0.92).is_some());
//! assert!(gate.lookup("chest_pain", 0.40).is_none());
//! assert_eq!(TriageMapper::default().level("chest_pain"), TriageLevel::Critical);
//! # Ok::<(), knowledge::KnowledgeError>(())
//! ```

mod error;
mod gate;
mod protocol;
mod triage;

pub use crate::error::KnowledgeError;
pub use crate::gate::{KnowledgeConfig, KnowledgeGate, DEFAULT_SAFETY_THRESHOLD};
pub use crate::protocol::{Protocol, ProtocolTable};
pub use crate::triage::{
    TriageLevel, TriageMapper, DEFAULT_CRITICAL_LABELS, DEFAULT_URGENT_LABELS,
};
