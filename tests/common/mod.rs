#![allow(dead_code)]

use std::sync::Arc;

use triage::demo_utils::{demo_assets, FixedEmbedding, FixedScores, DEMO_LABELS};
use triage::{
    AnchorSet, EmbeddingScorer, Preloaded, PrimaryScorer, TriageAssets, TriageConfig,
    TriageService,
};

pub fn label_index(label: &str) -> usize {
    DEMO_LABELS
        .iter()
        .position(|&l| l == label)
        .unwrap_or_else(|| panic!("{label} is not a demo label"))
}

/// Softmax-like output with `confidence` on `label` and the rest spread
/// evenly over the other labels.
pub fn peaked_scores(label: &str, confidence: f32) -> Vec<f32> {
    let rest = (1.0 - confidence) / (DEMO_LABELS.len() - 1) as f32;
    let mut scores = vec![rest; DEMO_LABELS.len()];
    scores[label_index(label)] = confidence;
    scores
}

/// Unit vector along `label`'s axis.
pub fn axis(label: &str) -> Vec<f32> {
    let mut v = vec![0.0; DEMO_LABELS.len()];
    v[label_index(label)] = 1.0;
    v
}

/// Unit embedding whose cosine similarity with `label`'s axis anchor is
/// `similarity`; the remainder is spread evenly over the other axes.
pub fn embedding_near(label: &str, similarity: f32) -> Vec<f32> {
    let others = (DEMO_LABELS.len() - 1) as f32;
    let rest = ((1.0 - similarity * similarity) / others).sqrt();
    let mut v = vec![rest; DEMO_LABELS.len()];
    v[label_index(label)] = similarity;
    v
}

/// Demo assets with one orthogonal anchor per label.
pub fn axis_assets(cfg: &TriageConfig) -> TriageAssets {
    let mut assets = demo_assets(cfg).expect("demo assets");
    let anchors = AnchorSet::new(DEMO_LABELS.iter().map(|&label| (label, axis(label))))
        .expect("axis anchors");
    assets.anchors = Arc::new(anchors);
    assets
}

/// Service whose engines always return the given outputs.
pub fn fixed_service(scores: Vec<f32>, embedding: Vec<f32>) -> TriageService {
    let cfg = TriageConfig::default();
    let primary: Arc<dyn PrimaryScorer> = Arc::new(FixedScores(scores));
    let semantic: Arc<dyn EmbeddingScorer> = Arc::new(FixedEmbedding(embedding));
    TriageService::new(
        &cfg,
        axis_assets(&cfg),
        Preloaded::new(primary),
        Preloaded::new(semantic),
    )
    .expect("service builds")
}
