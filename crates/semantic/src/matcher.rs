use std::sync::Arc;
use std::time::{Duration, Instant};

use engine::{
    bounded_call, CallGate, ClassificationResult, EmbeddingScorer, EngineCell, EngineError,
    EngineKind, EngineState, LoadError, Loader,
};
use tracing::{debug, warn};

use crate::anchors::AnchorSet;
use crate::wordpiece::WordPieceEncoder;
use crate::SemanticConfig;

/// Best `(label, similarity)` over `scores`.
///
/// Non-finite similarities are skipped. The first maximum wins.
pub fn best_match<'a, I>(scores: I) -> Option<(&'a str, f32)>
where
    I: IntoIterator<Item = (&'a str, f32)>,
{
    let mut best: Option<(&'a str, f32)> = None;
    for (label, score) in scores {
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((label, score)),
        }
    }
    best
}

/// Semantic fallback: embed the raw text and pick the nearest anchor.
pub struct SemanticMatcher {
    encoder: WordPieceEncoder,
    anchors: Arc<AnchorSet>,
    cell: EngineCell<dyn EmbeddingScorer>,
    gate: CallGate,
    timeout: Option<Duration>,
}

impl SemanticMatcher {
    pub fn new(
        encoder: WordPieceEncoder,
        anchors: Arc<AnchorSet>,
        loader: impl Loader<dyn EmbeddingScorer> + 'static,
        cfg: &SemanticConfig,
    ) -> Self {
        Self {
            encoder,
            anchors,
            cell: EngineCell::new(EngineKind::Semantic, loader),
            gate: CallGate::new(),
            timeout: cfg.timeout(),
        }
    }

    /// Loads the embedding scorer if it is not loaded yet. Idempotent.
    pub async fn warm_up(&self) -> Result<(), LoadError> {
        self.cell.get().await.map(|_| ())
    }

    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, EngineError> {
        let scorer = self.cell.get().await?;
        let start = Instant::now();
        let input = self
            .encoder
            .encode(text)
            .map_err(|e| EngineError::inference(EngineKind::Semantic, e.to_string()))?;
        let call = self.gate.run(scorer.is_reentrant(), scorer.run(&input));
        let embedding = bounded_call(EngineKind::Semantic, self.timeout, call).await?;

        let result = self.nearest(&embedding);
        let elapsed_micros = start.elapsed().as_micros();
        match &result {
            Ok(res) => debug!(
                label = %res.label,
                similarity = res.confidence,
                elapsed_micros,
                "semantic_matched"
            ),
            Err(err) => warn!(error = %err, elapsed_micros, "semantic_output_rejected"),
        }
        result
    }

    fn nearest(&self, embedding: &[f32]) -> Result<ClassificationResult, EngineError> {
        if embedding.len() != self.anchors.dim() {
            return Err(EngineError::inference(
                EngineKind::Semantic,
                format!(
                    "embedding dimension {} does not match anchor dimension {}",
                    embedding.len(),
                    self.anchors.dim()
                ),
            ));
        }
        let (label, score) = best_match(self.anchors.similarities(embedding)).ok_or_else(|| {
            EngineError::inference(EngineKind::Semantic, "no finite similarity to any anchor")
        })?;
        Ok(ClassificationResult::semantic(label, score))
    }

    pub fn reset(&self) {
        self.cell.reset();
    }

    pub fn state(&self) -> EngineState {
        self.cell.state()
    }

    pub fn load_attempts(&self) -> usize {
        self.cell.load_attempts()
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn encoder(&self) -> &WordPieceEncoder {
        &self.encoder
    }
}

impl std::fmt::Debug for SemanticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMatcher")
            .field("encoder", &self.encoder)
            .field("anchors", &self.anchors.len())
            .field("engine", &self.cell)
            .finish()
    }
}
