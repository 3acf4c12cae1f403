mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{axis_assets, embedding_near, peaked_scores};
use triage::demo_utils::{
    demo_assets, CountingLoader, FailingScorer, FixedEmbedding, FixedScores, SlowScores,
};
use triage::{
    BuildError, ClassificationError, EmbeddingScorer, EngineError, EngineKind, PrimaryScorer,
    RoutePath, TriageConfig, TriageService, CANNOT_ASSESS_MESSAGE,
};

fn build(
    primary: Arc<dyn PrimaryScorer>,
    semantic: Arc<dyn EmbeddingScorer>,
) -> TriageService {
    let cfg = TriageConfig::default();
    TriageService::new(
        &cfg,
        axis_assets(&cfg),
        CountingLoader::ok(primary),
        CountingLoader::ok(semantic),
    )
    .unwrap()
}

#[tokio::test]
async fn both_engines_failing_inference_cannot_classify() {
    let service = build(
        Arc::new(FailingScorer("primary exploded".into())),
        Arc::new(FailingScorer("semantic exploded".into())),
    );
    service.initialize().await.unwrap();

    let err = service.assess("anything").await.unwrap_err();
    match &err {
        ClassificationError::BothEnginesUnavailable { primary, semantic } => {
            assert!(matches!(primary, EngineError::Inference { .. }));
            assert!(matches!(semantic, EngineError::Inference { .. }));
            assert_eq!(primary.engine(), EngineKind::Primary);
            assert_eq!(semantic.engine(), EngineKind::Semantic);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), CANNOT_ASSESS_MESSAGE);
}

#[tokio::test]
async fn both_engines_unavailable_cannot_classify() {
    let cfg = TriageConfig::default();
    let service = TriageService::new(
        &cfg,
        axis_assets(&cfg),
        CountingLoader::<dyn PrimaryScorer>::failing("no model"),
        CountingLoader::<dyn EmbeddingScorer>::failing("no model"),
    )
    .unwrap();

    let init = service.initialize().await.unwrap_err();
    assert!(init.primary_failed() && init.semantic_failed());

    let err = service.classify("my arm hurts").await.unwrap_err();
    match err {
        ClassificationError::BothEnginesUnavailable { primary, semantic } => {
            assert!(primary.is_model_unavailable());
            assert!(semantic.is_model_unavailable());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn semantic_failure_degrades_to_weak_primary() {
    let service = build(
        Arc::new(FixedScores(peaked_scores("burn", 0.5))),
        Arc::new(FailingScorer("embedding oom".into())),
    );
    let assessment = service.assess("hot water on my hand").await.unwrap();
    assert_eq!(assessment.path, RoutePath::DegradedPrimary);
    assert_eq!(assessment.result.label, "burn");
    assert!(assessment.guidance_withheld());
}

#[tokio::test]
async fn malformed_primary_output_falls_back() {
    let service = build(
        Arc::new(FixedScores(vec![0.9, 0.1])),
        Arc::new(FixedEmbedding(embedding_near("cut", 0.9))),
    );
    let decision = service.route("small cut").await.unwrap();
    assert_eq!(decision.path, RoutePath::Semantic);
    assert_eq!(decision.result.label, "cut");

    let service = build(
        Arc::new(FixedScores(vec![f32::NAN; 10])),
        Arc::new(FixedEmbedding(embedding_near("cut", 0.9))),
    );
    assert_eq!(service.route("small cut").await.unwrap().path, RoutePath::Semantic);
}

#[tokio::test]
async fn mismatched_embedding_dimension_is_a_semantic_failure() {
    let service = build(
        Arc::new(FixedScores(peaked_scores("cut", 0.3))),
        Arc::new(FixedEmbedding(vec![1.0, 0.0, 0.0])),
    );
    let decision = service.route("small cut").await.unwrap();
    assert_eq!(decision.path, RoutePath::DegradedPrimary);
}

#[tokio::test]
async fn deadline_exceeded_is_reported() {
    let service = build(
        Arc::new(SlowScores {
            delay: Duration::from_millis(200),
            scores: peaked_scores("burn", 0.9),
        }),
        Arc::new(FixedEmbedding(embedding_near("burn", 0.9))),
    );
    service.initialize().await.unwrap();

    let err = service
        .classify_within("burnt my finger", Duration::from_millis(20))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClassificationError::DeadlineExceeded(Duration::from_millis(20))
    );
    assert_eq!(err.user_message(), CANNOT_ASSESS_MESSAGE);

    // The engine is untouched and answers when given enough time.
    let ok = service
        .assess_within("burnt my finger", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(ok.result.label, "burn");
}

#[tokio::test]
async fn per_call_timeout_triggers_fallback() {
    let mut cfg = TriageConfig::default();
    cfg.classifier.timeout_ms = Some(10);
    let primary: Arc<dyn PrimaryScorer> = Arc::new(SlowScores {
        delay: Duration::from_millis(200),
        scores: peaked_scores("burn", 0.9),
    });
    let semantic: Arc<dyn EmbeddingScorer> =
        Arc::new(FixedEmbedding(embedding_near("cut", 0.9)));
    let service = TriageService::new(
        &cfg,
        axis_assets(&cfg),
        CountingLoader::ok(primary),
        CountingLoader::ok(semantic),
    )
    .unwrap();

    let decision = service.route("burnt my finger").await.unwrap();
    assert_eq!(decision.path, RoutePath::Semantic);
    assert_eq!(decision.result.label, "cut");
}

#[test]
fn invalid_config_is_rejected_at_build_time() {
    let mut cfg = TriageConfig::default();
    cfg.router.primary_threshold = 2.0;
    let assets = demo_assets(&TriageConfig::default()).unwrap();
    let primary: Arc<dyn PrimaryScorer> = Arc::new(FixedScores(vec![]));
    let semantic: Arc<dyn EmbeddingScorer> = Arc::new(FixedEmbedding(vec![]));
    let err = TriageService::new(
        &cfg,
        assets,
        CountingLoader::ok(primary),
        CountingLoader::ok(semantic),
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
}

#[test]
fn wordpiece_vocab_without_unk_is_rejected() {
    let cfg = TriageConfig::default();
    let mut assets = demo_assets(&cfg).unwrap();
    assets.wordpiece_vocab = vec!["[PAD]".into(), "[CLS]".into(), "[SEP]".into()];
    let primary: Arc<dyn PrimaryScorer> = Arc::new(FixedScores(vec![]));
    let semantic: Arc<dyn EmbeddingScorer> = Arc::new(FixedEmbedding(vec![]));
    let err = TriageService::new(
        &cfg,
        assets,
        CountingLoader::ok(primary),
        CountingLoader::ok(semantic),
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::Semantic(_)));
}
