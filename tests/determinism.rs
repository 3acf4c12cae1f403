mod common;

use common::{embedding_near, fixed_service, peaked_scores};
use lexical::{LexicalConfig, SequenceEncoder};
use std::sync::Arc;
use triage::demo_utils::{demo_anchors, demo_service, demo_vocabulary};
use triage::{
    AnchorSet, LabelSet, ProtocolTable, SemanticConfig, TriageConfig, TriageLevel, TriageMapper,
};

#[test]
fn loading_tables_twice_is_byte_identical() {
    let protocols_a = serde_json::to_vec(&ProtocolTable::builtin().unwrap()).unwrap();
    let protocols_b = serde_json::to_vec(&ProtocolTable::builtin().unwrap()).unwrap();
    assert_eq!(protocols_a, protocols_b);

    let labels_json = r#"["chest_pain", "burn", "abdominal_pain"]"#;
    let labels_a = serde_json::to_vec(&LabelSet::from_json_str(labels_json).unwrap()).unwrap();
    let labels_b = serde_json::to_vec(&LabelSet::from_json_str(labels_json).unwrap()).unwrap();
    assert_eq!(labels_a, labels_b);

    let anchors_json = r#"{"burn": [0.0, 1.0], "abdominal_pain": [1.0, 0.0]}"#;
    let anchors_a = serde_json::to_vec(&AnchorSet::from_json_str(anchors_json).unwrap()).unwrap();
    let anchors_b = serde_json::to_vec(&AnchorSet::from_json_str(anchors_json).unwrap()).unwrap();
    assert_eq!(anchors_a, anchors_b);
}

#[test]
fn demo_anchors_are_reproducible() {
    let cfg = SemanticConfig::default();
    let scorer = semantic::HashEmbeddingScorer::default();
    let a = serde_json::to_vec(&demo_anchors(&cfg, &scorer).unwrap()).unwrap();
    let b = serde_json::to_vec(&demo_anchors(&cfg, &scorer).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn equivalent_inputs_encode_identically() {
    let encoder =
        SequenceEncoder::new(&LexicalConfig::default(), Arc::new(demo_vocabulary().unwrap()))
            .unwrap();
    let a = encoder.encode_text("  Help!! My CHEST hurts, please...  ");
    let b = encoder.encode_text("chest hurt");
    assert_eq!(a, b);
    assert_eq!(a.len(), 15);
}

#[tokio::test]
async fn repeated_assessments_are_identical() {
    let service = fixed_service(
        peaked_scores("burn", 0.40),
        embedding_near("abdominal_pain", 0.81),
    );
    let first = service.assess("my tummy feels like it's on fire").await.unwrap();
    for _ in 0..10 {
        let next = service.assess("my tummy feels like it's on fire").await.unwrap();
        assert_eq!(next, first);
    }
}

#[tokio::test]
async fn demo_service_is_deterministic_across_instances() {
    let inputs = [
        "My chest really hurts and I can't breathe",
        "I think I broke my arm",
        "there is blood everywhere",
        "",
        "🤕🤕🤕",
    ];
    let a = demo_service(&TriageConfig::default()).unwrap();
    let b = demo_service(&TriageConfig::default()).unwrap();
    for text in inputs {
        let left = serde_json::to_vec(&a.assess(text).await.unwrap()).unwrap();
        let right = serde_json::to_vec(&b.assess(text).await.unwrap()).unwrap();
        assert_eq!(left, right, "{text:?}");
    }
}

#[test]
fn triage_mapping_is_total() {
    let mapper = TriageMapper::default();
    for label in ["chest_pain", "abdominal_pain", "", "Chest_Pain", "made_up_label"] {
        let level = mapper.level(label);
        assert_eq!(level, mapper.level(label));
    }
    assert_eq!(mapper.level("made_up_label"), TriageLevel::Routine);
}
