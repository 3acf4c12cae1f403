use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::KnowledgeError;

const BUILTIN_PROTOCOLS: &str = include_str!("../data/protocols.json");

/// Validated first-aid guidance for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub title: String,
    pub steps: Vec<String>,
}

/// Label → [`Protocol`], read-only once loaded.
///
/// Keys are matched exactly and case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProtocolTable {
    protocols: BTreeMap<String, Protocol>,
}

impl ProtocolTable {
    pub fn new<I, S>(entries: I) -> Result<Self, KnowledgeError>
    where
        I: IntoIterator<Item = (S, Protocol)>,
        S: Into<String>,
    {
        let mut protocols = BTreeMap::new();
        for (label, protocol) in entries {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(KnowledgeError::BlankLabel);
            }
            if protocol.title.trim().is_empty() {
                return Err(KnowledgeError::EmptyTitle(label));
            }
            if protocol.steps.is_empty() {
                return Err(KnowledgeError::EmptySteps(label));
            }
            protocols.insert(label, protocol);
        }
        Ok(Self { protocols })
    }

    /// Parses a JSON object of `label → { "title", "steps" }`.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let raw: BTreeMap<String, Protocol> = serde_json::from_str(json)?;
        Self::new(raw)
    }

    /// The protocols bundled with the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUILTIN_PROTOCOLS)
    }

    pub fn get(&self, label: &str) -> Option<&Protocol> {
        self.protocols.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.protocols.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.protocols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}
