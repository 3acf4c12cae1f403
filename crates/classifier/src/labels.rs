use std::sync::Arc;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("label list is empty")]
    Empty,
    #[error("duplicate label `{0}`")]
    Duplicate(String),
    #[error("blank label at index {0}")]
    Blank(usize),
    #[error("invalid label json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LabelError {
    fn from(err: serde_json::Error) -> Self {
        LabelError::Json(err.to_string())
    }
}

/// Ordered intent labels, parallel to the primary scorer's output vector.
///
/// Index `i` names score `i` for the lifetime of the set. The set is
/// immutable once built and cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Arc<[String]>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        let mut seen = FxHashSet::default();
        for (idx, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(LabelError::Blank(idx));
            }
            if !seen.insert(label.as_str()) {
                return Err(LabelError::Duplicate(label.clone()));
            }
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// Parses a JSON array of strings, e.g. the `labels.json` exported next to
    /// the model.
    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let labels: Vec<String> = serde_json::from_str(json)?;
        Self::new(labels)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let labels = Vec::<String>::deserialize(deserializer)?;
        LabelSet::new(labels).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order() {
        let set = LabelSet::new(["fracture", "chest_pain", "burn"]).unwrap();
        assert_eq!(set.get(1), Some("chest_pain"));
        assert_eq!(set.index_of("burn"), Some(2));
        assert_eq!(set.get(3), None);
        assert_eq!(set.iter().collect::<Vec<_>>(), ["fracture", "chest_pain", "burn"]);
    }

    #[test]
    fn rejects_empty_duplicate_and_blank() {
        assert_eq!(LabelSet::new(Vec::<String>::new()), Err(LabelError::Empty));
        assert_eq!(
            LabelSet::new(["burn", "cut", "burn"]),
            Err(LabelError::Duplicate("burn".into()))
        );
        assert_eq!(LabelSet::new(["burn", " "]), Err(LabelError::Blank(1)));
    }

    #[test]
    fn json_round_trip_validates() {
        let set = LabelSet::from_json_str(r#"["choking","burn"]"#).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["choking","burn"]"#);
        assert!(matches!(
            LabelSet::from_json_str(r#"["a","a"]"#),
            Err(LabelError::Duplicate(_))
        ));
        assert!(matches!(
            LabelSet::from_json_str("{"),
            Err(LabelError::Json(_))
        ));
        assert!(serde_json::from_str::<LabelSet>("[]").is_err());
    }
}
