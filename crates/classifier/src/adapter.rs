use std::time::{Duration, Instant};

use engine::{
    bounded_call, CallGate, ClassificationResult, EngineCell, EngineError, EngineKind,
    EngineState, LoadError, Loader, PrimaryScorer,
};
use lexical::{EncodedSequence, SequenceEncoder};
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::labels::LabelSet;

/// Index and value of the largest score.
///
/// NaN entries are skipped. Ties resolve to the lowest index. Returns `None`
/// when every entry is NaN (or the slice is empty).
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

/// Adapter around the injected primary scorer.
///
/// Loads the scorer on first use through its [`EngineCell`], runs it on the
/// fixed-length id sequence and maps the arg-max score back to a label.
pub struct PrimaryClassifier {
    labels: LabelSet,
    encoder: SequenceEncoder,
    cell: EngineCell<dyn PrimaryScorer>,
    gate: CallGate,
    timeout: Option<Duration>,
}

impl PrimaryClassifier {
    pub fn new(
        labels: LabelSet,
        encoder: SequenceEncoder,
        loader: impl Loader<dyn PrimaryScorer> + 'static,
        cfg: &ClassifierConfig,
    ) -> Self {
        Self {
            labels,
            encoder,
            cell: EngineCell::new(EngineKind::Primary, loader),
            gate: CallGate::new(),
            timeout: cfg.timeout(),
        }
    }

    /// Loads the scorer if it is not loaded yet. Idempotent.
    pub async fn warm_up(&self) -> Result<(), LoadError> {
        self.cell.get().await.map(|_| ())
    }

    /// Normalizes and encodes `text`, then classifies the sequence.
    pub async fn classify_text(&self, text: &str) -> Result<ClassificationResult, EngineError> {
        let sequence = self.encoder.encode_text(text);
        self.classify(&sequence).await
    }

    pub async fn classify(
        &self,
        sequence: &EncodedSequence,
    ) -> Result<ClassificationResult, EngineError> {
        let scorer = self.cell.get().await?;
        let start = Instant::now();
        let call = self
            .gate
            .run(scorer.is_reentrant(), scorer.run(sequence.as_slice()));
        let scores = bounded_call(EngineKind::Primary, self.timeout, call).await?;

        let result = self.pick(&scores);
        let elapsed_micros = start.elapsed().as_micros();
        match &result {
            Ok(res) => debug!(
                label = %res.label,
                confidence = res.confidence,
                elapsed_micros,
                "primary_scored"
            ),
            Err(err) => warn!(error = %err, elapsed_micros, "primary_output_rejected"),
        }
        result
    }

    fn pick(&self, scores: &[f32]) -> Result<ClassificationResult, EngineError> {
        if scores.len() != self.labels.len() {
            return Err(EngineError::inference(
                EngineKind::Primary,
                format!(
                    "scorer returned {} scores for {} labels",
                    scores.len(),
                    self.labels.len()
                ),
            ));
        }
        let (idx, score) = argmax(scores).ok_or_else(|| {
            EngineError::inference(EngineKind::Primary, "scorer returned only NaN scores")
        })?;
        let label = self.labels.get(idx).ok_or_else(|| {
            EngineError::inference(EngineKind::Primary, format!("no label at index {idx}"))
        })?;
        Ok(ClassificationResult::primary(label, score))
    }

    /// Drops the cached load outcome so the next call loads again.
    pub fn reset(&self) {
        self.cell.reset();
    }

    pub fn state(&self) -> EngineState {
        self.cell.state()
    }

    pub fn load_attempts(&self) -> usize {
        self.cell.load_attempts()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }
}

impl std::fmt::Debug for PrimaryClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryClassifier")
            .field("labels", &self.labels.len())
            .field("max_len", &self.encoder.max_len())
            .field("engine", &self.cell)
            .field("timeout", &self.timeout)
            .finish()
    }
}
