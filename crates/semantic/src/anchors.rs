use std::collections::BTreeMap;

use fxhash::FxHashSet;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::normalize::cosine_similarity;
use crate::AnchorError;

/// One reference embedding per label.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub label: String,
    pub vector: Vec<f32>,
}

/// Read-only label → anchor vector table.
///
/// All vectors share one dimension. Iteration follows insertion order, which
/// is also the tie-break order when matching.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
    dim: usize,
}

impl AnchorSet {
    pub fn new<I, S>(anchors: I) -> Result<Self, AnchorError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let anchors: Vec<Anchor> = anchors
            .into_iter()
            .map(|(label, vector)| Anchor {
                label: label.into(),
                vector,
            })
            .collect();
        let first = anchors.first().ok_or(AnchorError::Empty)?;
        let dim = first.vector.len();
        if dim == 0 {
            return Err(AnchorError::ZeroDimension);
        }

        let mut seen = FxHashSet::default();
        for anchor in &anchors {
            if !seen.insert(anchor.label.as_str()) {
                return Err(AnchorError::Duplicate(anchor.label.clone()));
            }
            if anchor.vector.len() != dim {
                return Err(AnchorError::DimensionMismatch {
                    label: anchor.label.clone(),
                    expected: dim,
                    found: anchor.vector.len(),
                });
            }
            if anchor.vector.iter().any(|x| !x.is_finite()) {
                return Err(AnchorError::NonFinite {
                    label: anchor.label.clone(),
                });
            }
        }

        Ok(Self { anchors, dim })
    }

    /// Parses a JSON object of `label → [f32, ...]`. Anchors come out sorted
    /// by label, so the same file always yields the same order.
    pub fn from_json_str(json: &str) -> Result<Self, AnchorError> {
        let table: BTreeMap<String, Vec<f32>> = serde_json::from_str(json)?;
        Self::new(table)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Cosine similarity of `embedding` against every anchor, in order.
    /// Zero-norm vectors on either side score 0.0.
    pub(crate) fn similarities<'a>(
        &'a self,
        embedding: &'a [f32],
    ) -> impl Iterator<Item = (&'a str, f32)> + 'a {
        self.anchors.iter().map(move |anchor| {
            (
                anchor.label.as_str(),
                cosine_similarity(&anchor.vector, embedding),
            )
        })
    }
}

impl Serialize for AnchorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.anchors.len()))?;
        for anchor in &self.anchors {
            map.serialize_entry(&anchor.label, &anchor.vector)?;
        }
        map.end()
    }
}
