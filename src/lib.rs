//! Workspace umbrella crate for the symptom triage core.
//!
//! This crate wires the stage crates into one [`TriageService`]: lexical
//! encoding, the primary classifier, the semantic fallback, the hybrid
//! router, and the confidence-gated knowledge lookup. Callers inject the two
//! inference engines through [`Loader`]s plus the read-only tables in
//! [`TriageAssets`]; everything else is built from a [`TriageConfig`].
//!
//! ```
//! use triage::demo_utils::demo_service;
//! use triage::{TriageConfig, TriageLevel};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = demo_service(&TriageConfig::default()).unwrap();
//! service.initialize().await.unwrap();
//! let assessment = service.assess("My chest really hurts and I can't breathe").await.unwrap();
//! assert_eq!(assessment.result.label, "chest_pain");
//! assert_eq!(assessment.triage, TriageLevel::Critical);
//! # });
//! ```

pub mod config;

#[doc(hidden)]
pub mod demo_utils;

pub use crate::config::{ConfigLoadError, TriageConfig, CONFIG_ENV_VAR};
pub use classifier::{ClassifierConfig, LabelError, LabelSet};
pub use engine::{
    loader_fn, ClassificationResult, EmbeddingInput, EmbeddingScorer, EngineError, EngineKind,
    EngineState, LoadError, Loader, Preloaded, PrimaryScorer, ScorerError, Source,
};
pub use knowledge::{
    KnowledgeConfig, KnowledgeError, KnowledgeGate, Protocol, ProtocolTable, TriageLevel,
    TriageMapper,
};
pub use lexical::{LexicalConfig, LexicalError, Vocabulary};
pub use router::{
    ClassificationError, EngineInitError, InvalidRouterConfig, RouteDecision, RoutePath, Router,
    RouterConfig, RouterState, CANNOT_ASSESS_MESSAGE,
};
pub use semantic::{AnchorError, AnchorSet, SemanticConfig, SemanticError};

use std::sync::Arc;
use std::time::{Duration, Instant};

use classifier::PrimaryClassifier;
use lexical::SequenceEncoder;
use semantic::{bert_wordpiece_tokenizer, SemanticMatcher, WordPieceEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while assembling a [`TriageService`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error("lexical stage: {0}")]
    Lexical(#[from] LexicalError),
    #[error("semantic stage: {0}")]
    Semantic(#[from] SemanticError),
    #[error("anchor table: {0}")]
    Anchors(#[from] AnchorError),
    #[error("label list: {0}")]
    Labels(#[from] LabelError),
    #[error(transparent)]
    Router(#[from] InvalidRouterConfig),
    #[error("knowledge stage: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Read-only tables the service is built from. Loading them from disk or a
/// bundle is the caller's job.
#[derive(Debug, Clone)]
pub struct TriageAssets {
    /// Word index of the primary classifier's tokenizer.
    pub vocabulary: Arc<Vocabulary>,
    /// Labels parallel to the primary classifier's output vector.
    pub labels: LabelSet,
    /// WordPiece vocabulary of the sentence-embedding model, in id order.
    pub wordpiece_vocab: Vec<String>,
    /// One reference embedding per semantic label.
    pub anchors: Arc<AnchorSet>,
    /// First-aid guidance per label.
    pub protocols: Arc<ProtocolTable>,
}

/// Classification plus the guidance and triage level derived from it.
///
/// `protocol` is `None` when the confidence is below the safety threshold or
/// the label has no protocol; `triage` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: ClassificationResult,
    pub path: RoutePath,
    pub protocol: Option<Protocol>,
    pub triage: TriageLevel,
}

impl Assessment {
    pub fn guidance_withheld(&self) -> bool {
        self.protocol.is_none()
    }
}

/// Entry point used by the chat front end.
///
/// `initialize` may be called any number of times, from any number of tasks;
/// each engine loads once. `classify` works without it and loads engines on
/// first use.
pub struct TriageService {
    router: Router,
    gate: KnowledgeGate,
    triage: TriageMapper,
}

impl TriageService {
    /// Builds the full pipeline from config, tables, and engine loaders.
    pub fn new(
        config: &TriageConfig,
        assets: TriageAssets,
        primary_loader: impl Loader<dyn PrimaryScorer> + 'static,
        semantic_loader: impl Loader<dyn EmbeddingScorer> + 'static,
    ) -> Result<Self, BuildError> {
        config.validate()?;

        let sequence_encoder = SequenceEncoder::new(&config.lexical, assets.vocabulary)?;
        let primary = PrimaryClassifier::new(
            assets.labels,
            sequence_encoder,
            primary_loader,
            &config.classifier,
        );

        let tokenizer = bert_wordpiece_tokenizer(&assets.wordpiece_vocab)?;
        let wordpiece = WordPieceEncoder::new(tokenizer, &config.semantic)?;
        let semantic =
            SemanticMatcher::new(wordpiece, assets.anchors, semantic_loader, &config.semantic);

        let router = Router::new(Arc::new(primary), Arc::new(semantic), config.router.clone())?;
        let gate = KnowledgeGate::new(assets.protocols, config.knowledge.safety_threshold)?;
        let triage = TriageMapper::with_overrides(config.knowledge.triage_overrides.clone());

        info!(
            primary_threshold = config.router.primary_threshold,
            safety_threshold = config.knowledge.safety_threshold,
            protocols = gate.table().len(),
            "triage_service_built"
        );
        Ok(Self::from_parts(router, gate, triage))
    }

    /// Assembles a service around an already built router.
    pub fn from_parts(router: Router, gate: KnowledgeGate, triage: TriageMapper) -> Self {
        Self {
            router,
            gate,
            triage,
        }
    }

    /// Loads both engines concurrently. Idempotent; failures are cached per
    /// engine until [`reset`](Self::reset).
    pub async fn initialize(&self) -> Result<(), EngineInitError> {
        self.router.warm_up().await
    }

    pub async fn classify(&self, raw_text: &str) -> Result<ClassificationResult, ClassificationError> {
        self.router.classify(raw_text).await
    }

    /// Like [`classify`](Self::classify), with the routing trace.
    pub async fn route(&self, raw_text: &str) -> Result<RouteDecision, ClassificationError> {
        self.router.route(raw_text).await
    }

    /// [`classify`](Self::classify) bounded by `deadline`.
    pub async fn classify_within(
        &self,
        raw_text: &str,
        deadline: Duration,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.route_within(raw_text, deadline)
            .await
            .map(|decision| decision.result)
    }

    /// Classifies `raw_text` and attaches guidance and triage level.
    pub async fn assess(&self, raw_text: &str) -> Result<Assessment, ClassificationError> {
        let start = Instant::now();
        let decision = self.router.route(raw_text).await?;
        Ok(self.assemble(decision, start))
    }

    /// [`assess`](Self::assess) bounded by `deadline`.
    pub async fn assess_within(
        &self,
        raw_text: &str,
        deadline: Duration,
    ) -> Result<Assessment, ClassificationError> {
        let start = Instant::now();
        let decision = self.route_within(raw_text, deadline).await?;
        Ok(self.assemble(decision, start))
    }

    /// Guidance for `label`, or `None` below the safety threshold.
    pub fn lookup_protocol(&self, label: &str, confidence: f32) -> Option<&Protocol> {
        self.gate.lookup(label, confidence)
    }

    pub fn triage_level(&self, label: &str) -> TriageLevel {
        self.triage.level(label)
    }

    /// Drops both engines' cached load outcomes so the next call reloads.
    pub fn reset(&self) {
        self.router.reset();
    }

    /// `(primary, semantic)` engine states.
    pub fn engine_states(&self) -> (EngineState, EngineState) {
        self.router.engine_states()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn gate(&self) -> &KnowledgeGate {
        &self.gate
    }

    async fn route_within(
        &self,
        raw_text: &str,
        deadline: Duration,
    ) -> Result<RouteDecision, ClassificationError> {
        match tokio::time::timeout(deadline, self.router.route(raw_text)).await {
            Ok(decision) => decision,
            Err(_) => {
                let deadline_ms = deadline.as_millis() as u64;
                warn!(deadline_ms, "classification_deadline_exceeded");
                Err(ClassificationError::DeadlineExceeded(deadline))
            }
        }
    }

    fn assemble(&self, decision: RouteDecision, start: Instant) -> Assessment {
        let RouteDecision { result, path, .. } = decision;
        let protocol = self.gate.lookup(&result.label, result.confidence).cloned();
        let triage = self.triage.level(&result.label);

        let elapsed_micros = start.elapsed().as_micros();
        info!(
            label = %result.label,
            confidence = result.confidence,
            triage = %triage,
            guidance = protocol.is_some(),
            elapsed_micros,
            "assessment_ready"
        );
        Assessment {
            result,
            path,
            protocol,
            triage,
        }
    }
}

impl std::fmt::Debug for TriageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageService")
            .field("router", &self.router)
            .field("safety_threshold", &self.gate.safety_threshold())
            .finish()
    }
}
