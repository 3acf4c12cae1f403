use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::{Protocol, ProtocolTable};
use crate::triage::TriageLevel;
use crate::KnowledgeError;

/// Default minimum confidence for showing guidance.
pub const DEFAULT_SAFETY_THRESHOLD: f32 = 0.65;

/// Knowledge gate and triage settings.
///
/// `safety_threshold` is independent of the router's primary threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Guidance is withheld when confidence is below this value.
    pub safety_threshold: f32,
    /// Per-label triage levels applied over the default table.
    pub triage_overrides: BTreeMap<String, TriageLevel>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            safety_threshold: DEFAULT_SAFETY_THRESHOLD,
            triage_overrides: BTreeMap::new(),
        }
    }
}

impl KnowledgeConfig {
    pub fn with_safety_threshold(mut self, threshold: f32) -> Self {
        self.safety_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), KnowledgeError> {
        if !(0.0..=1.0).contains(&self.safety_threshold) {
            return Err(KnowledgeError::InvalidThreshold(self.safety_threshold));
        }
        Ok(())
    }
}

/// Confidence-gated protocol lookup.
#[derive(Debug, Clone)]
pub struct KnowledgeGate {
    table: Arc<ProtocolTable>,
    safety_threshold: f32,
}

impl KnowledgeGate {
    pub fn new(table: Arc<ProtocolTable>, safety_threshold: f32) -> Result<Self, KnowledgeError> {
        if !(0.0..=1.0).contains(&safety_threshold) {
            return Err(KnowledgeError::InvalidThreshold(safety_threshold));
        }
        Ok(Self {
            table,
            safety_threshold,
        })
    }

    /// Returns the protocol for `label` only when `confidence` reaches the
    /// safety threshold and the label is known. NaN confidence never passes.
    pub fn lookup(&self, label: &str, confidence: f32) -> Option<&Protocol> {
        if confidence.is_nan() || confidence < self.safety_threshold {
            debug!(
                label,
                confidence,
                threshold = self.safety_threshold,
                "knowledge_gate_suppressed"
            );
            return None;
        }
        self.table.get(label)
    }

    pub fn safety_threshold(&self) -> f32 {
        self.safety_threshold
    }

    pub fn table(&self) -> &ProtocolTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(threshold: f32) -> KnowledgeGate {
        KnowledgeGate::new(Arc::new(ProtocolTable::builtin().unwrap()), threshold).unwrap()
    }

    #[test]
    fn below_threshold_is_always_none() {
        let g = gate(0.65);
        let labels: Vec<String> = g.table().labels().map(str::to_string).collect();
        for label in &labels {
            for confidence in [0.0, 0.3, 0.64, 0.6499] {
                assert!(g.lookup(label, confidence).is_none(), "{label} @ {confidence}");
            }
            assert!(g.lookup(label, 0.65).is_some(), "{label} @ threshold");
        }
    }

    #[test]
    fn unknown_label_is_none() {
        let g = gate(0.65);
        assert!(g.lookup("not_a_label", 0.99).is_none());
        assert!(g.lookup("Chest_Pain", 0.99).is_none());
    }

    #[test]
    fn nan_confidence_is_suppressed() {
        assert!(gate(0.0).lookup("burn", f32::NAN).is_none());
    }

    #[test]
    fn threshold_is_configurable() {
        let g = gate(0.9);
        assert!(g.lookup("burn", 0.85).is_none());
        assert!(g.lookup("burn", 0.95).is_some());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let table = Arc::new(ProtocolTable::default());
        assert_eq!(
            KnowledgeGate::new(table, 1.2).unwrap_err(),
            KnowledgeError::InvalidThreshold(1.2)
        );
        assert!(KnowledgeConfig::default().with_safety_threshold(-0.5).validate().is_err());
    }
}
