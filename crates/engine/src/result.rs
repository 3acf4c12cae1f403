use serde::{Deserialize, Serialize};

/// Which path produced a [`ClassificationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Primary,
    Semantic,
}

/// A label with its confidence.
///
/// Primary confidences are softmax probabilities and semantic ones are
/// similarity scores. The two scales are not comparable; thresholds treat
/// them the same way anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
    pub source: Source,
}

impl ClassificationResult {
    /// Builds a result, clamping `confidence` into `[0, 1]` (NaN becomes 0).
    pub fn new(label: impl Into<String>, confidence: f32, source: Source) -> Self {
        Self {
            label: label.into(),
            confidence: clamp_confidence(confidence),
            source,
        }
    }

    pub fn primary(label: impl Into<String>, confidence: f32) -> Self {
        Self::new(label, confidence, Source::Primary)
    }

    pub fn semantic(label: impl Into<String>, confidence: f32) -> Self {
        Self::new(label, confidence, Source::Semantic)
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
