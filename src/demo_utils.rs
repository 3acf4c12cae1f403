//! Demo assets and engine doubles shared by the binary, doctests, tests and
//! benches. None of this carries medical meaning.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use engine::{EmbeddingInput, EmbeddingScorer, Loader, Preloaded, PrimaryScorer, ScorerError};
use fxhash::FxHashMap;
use knowledge::ProtocolTable;
use lexical::{Vocabulary, DEFAULT_OOV_ID};
use semantic::{
    bert_wordpiece_tokenizer, AnchorSet, HashEmbeddingScorer, SemanticConfig, WordPieceEncoder,
    DEFAULT_STUB_DIM,
};

use crate::{BuildError, LabelSet, TriageAssets, TriageConfig, TriageService};

/// Labels of the demo classifier, in output order.
pub const DEMO_LABELS: &[&str] = &[
    "abdominal_pain",
    "allergic_reaction",
    "anaphylaxis",
    "burn",
    "chest_pain",
    "choking",
    "cut",
    "fracture",
    "head_injury",
    "severe_bleeding",
];

/// Normalized keyword → demo label.
pub const DEMO_KEYWORDS: &[(&str, &str)] = &[
    ("stomach", "abdominal_pain"),
    ("tummy", "abdominal_pain"),
    ("belly", "abdominal_pain"),
    ("abdomen", "abdominal_pain"),
    ("cramp", "abdominal_pain"),
    ("rash", "allergic_reaction"),
    ("hive", "allergic_reaction"),
    ("itchy", "allergic_reaction"),
    ("allergy", "allergic_reaction"),
    ("throat", "anaphylaxis"),
    ("swelling", "anaphylaxis"),
    ("swollen", "anaphylaxis"),
    ("epipen", "anaphylaxis"),
    ("burn", "burn"),
    ("burned", "burn"),
    ("scald", "burn"),
    ("fire", "burn"),
    ("chest", "chest_pain"),
    ("heart", "chest_pain"),
    ("breathe", "chest_pain"),
    ("choke", "choking"),
    ("choking", "choking"),
    ("swallowed", "choking"),
    ("cut", "cut"),
    ("graze", "cut"),
    ("knife", "cut"),
    ("broke", "fracture"),
    ("broken", "fracture"),
    ("bone", "fracture"),
    ("fracture", "fracture"),
    ("head", "head_injury"),
    ("concussion", "head_injury"),
    ("dizzy", "head_injury"),
    ("bleeding", "severe_bleeding"),
    ("blood", "severe_bleeding"),
    ("wound", "severe_bleeding"),
];

/// One example phrase per label; the demo anchors are their embeddings.
pub const DEMO_EXEMPLARS: &[(&str, &str)] = &[
    ("abdominal_pain", "my tummy feels like it's on fire"),
    ("allergic_reaction", "i have an itchy rash and hives"),
    ("anaphylaxis", "my throat is swelling after a bee sting"),
    ("burn", "i burned my hand on the stove"),
    ("chest_pain", "my chest really hurts and i can't breathe"),
    ("choking", "he is choking on food"),
    ("cut", "i cut my finger with a knife"),
    ("fracture", "i think i broke my arm"),
    ("head_injury", "i hit my head and feel dizzy"),
    ("severe_bleeding", "the wound will not stop bleeding"),
];

/// WordPiece vocabulary of the demo embedder, in id order.
pub const DEMO_WORDPIECE_VOCAB: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "my", "tummy", "feel", "##s", "like", "it", "'", "s", "on",
    "fire", "i", "have", "an", "itchy", "rash", "and", "hive", "throat", "is", "swelling", "after",
    "a", "bee", "sting", "burn", "##ed", "hand", "the", "stove", "chest", "really", "hurt", "can",
    "t", "breathe", "he", "choking", "food", "cut", "finger", "with", "knife", "think", "broke",
    "arm", "hit", "head", "dizzy", "wound", "will", "not", "stop", "bleeding",
];

/// Primary scorer that returns the same scores for every input.
#[derive(Debug, Clone)]
pub struct FixedScores(pub Vec<f32>);

#[async_trait]
impl PrimaryScorer for FixedScores {
    async fn run(&self, _input: &[u32]) -> Result<Vec<f32>, ScorerError> {
        Ok(self.0.clone())
    }
}

/// Embedding scorer that returns the same vector for every input.
#[derive(Debug, Clone)]
pub struct FixedEmbedding(pub Vec<f32>);

#[async_trait]
impl EmbeddingScorer for FixedEmbedding {
    async fn run(&self, _input: &EmbeddingInput) -> Result<Vec<f32>, ScorerError> {
        Ok(self.0.clone())
    }
}

/// Scorer that loads fine and fails on every call.
#[derive(Debug, Clone)]
pub struct FailingScorer(pub String);

#[async_trait]
impl PrimaryScorer for FailingScorer {
    async fn run(&self, _input: &[u32]) -> Result<Vec<f32>, ScorerError> {
        Err(ScorerError::new(self.0.clone()))
    }
}

#[async_trait]
impl EmbeddingScorer for FailingScorer {
    async fn run(&self, _input: &EmbeddingInput) -> Result<Vec<f32>, ScorerError> {
        Err(ScorerError::new(self.0.clone()))
    }
}

/// Scorer that sleeps before answering, for deadline tests.
#[derive(Debug, Clone)]
pub struct SlowScores {
    pub delay: Duration,
    pub scores: Vec<f32>,
}

#[async_trait]
impl PrimaryScorer for SlowScores {
    async fn run(&self, _input: &[u32]) -> Result<Vec<f32>, ScorerError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.scores.clone())
    }
}

/// Loader that counts how often it is asked to load, optionally after a
/// delay, and always yields the same outcome.
pub struct CountingLoader<T: ?Sized> {
    outcome: Result<Arc<T>, ScorerError>,
    delay: Duration,
    loads: Arc<AtomicUsize>,
}

impl<T: ?Sized> CountingLoader<T> {
    pub fn ok(engine: Arc<T>) -> Self {
        Self::with_outcome(Ok(engine))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(Err(ScorerError::new(reason)))
    }

    fn with_outcome(outcome: Result<Arc<T>, ScorerError>) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared handle on the load counter; stays valid after the loader is
    /// moved into an engine.
    pub fn counter(&self) -> LoadCounter {
        LoadCounter(Arc::clone(&self.loads))
    }
}

#[async_trait]
impl<T: ?Sized + Send + Sync> Loader<T> for CountingLoader<T> {
    async fn load(&self) -> Result<Arc<T>, ScorerError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

#[derive(Debug, Clone)]
pub struct LoadCounter(Arc<AtomicUsize>);

impl LoadCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Keyword-voting stand-in for the primary classifier.
///
/// Every token id that belongs to a label's keyword list adds one vote to
/// that label; the votes are scaled by `sharpness` and passed through a
/// softmax. Inputs without any keyword get a uniform distribution.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    votes: FxHashMap<u32, usize>,
    label_count: usize,
    sharpness: f32,
}

impl KeywordScorer {
    pub fn new(votes: FxHashMap<u32, usize>, label_count: usize) -> Self {
        Self {
            votes,
            label_count,
            sharpness: 2.0,
        }
    }

    pub fn with_sharpness(mut self, sharpness: f32) -> Self {
        self.sharpness = sharpness;
        self
    }

    /// Scorer over [`DEMO_KEYWORDS`], using the ids of [`demo_vocabulary`].
    pub fn demo() -> Self {
        let labels: FxHashMap<&str, usize> = DEMO_LABELS
            .iter()
            .enumerate()
            .map(|(idx, &label)| (label, idx))
            .collect();
        let votes = DEMO_KEYWORDS
            .iter()
            .enumerate()
            .filter_map(|(pos, (_, label))| labels.get(label).map(|&idx| (keyword_id(pos), idx)))
            .collect();
        Self::new(votes, DEMO_LABELS.len())
    }

    pub fn score(&self, input: &[u32]) -> Vec<f32> {
        let mut counts = vec![0f32; self.label_count];
        for id in input {
            if let Some(&idx) = self.votes.get(id) {
                if let Some(count) = counts.get_mut(idx) {
                    *count += 1.0;
                }
            }
        }
        softmax(counts.iter().map(|c| c * self.sharpness))
    }
}

#[async_trait]
impl PrimaryScorer for KeywordScorer {
    async fn run(&self, input: &[u32]) -> Result<Vec<f32>, ScorerError> {
        Ok(self.score(input))
    }
}

fn softmax(logits: impl Iterator<Item = f32>) -> Vec<f32> {
    let logits: Vec<f32> = logits.collect();
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn keyword_id(position: usize) -> u32 {
    DEFAULT_OOV_ID + 1 + position as u32
}

/// Word index with `<OOV>` at 1 and every demo keyword after it.
pub fn demo_vocabulary() -> Result<Vocabulary, BuildError> {
    let entries = DEMO_KEYWORDS
        .iter()
        .enumerate()
        .map(|(pos, (word, _))| (*word, keyword_id(pos)));
    Ok(Vocabulary::new(entries, DEFAULT_OOV_ID)?)
}

/// Anchors built by embedding [`DEMO_EXEMPLARS`] with `scorer`.
pub fn demo_anchors(
    cfg: &SemanticConfig,
    scorer: &HashEmbeddingScorer,
) -> Result<AnchorSet, BuildError> {
    let encoder = WordPieceEncoder::new(bert_wordpiece_tokenizer(DEMO_WORDPIECE_VOCAB)?, cfg)?;
    let mut anchors = Vec::with_capacity(DEMO_EXEMPLARS.len());
    for (label, phrase) in DEMO_EXEMPLARS {
        anchors.push((*label, scorer.embed(&encoder.encode(phrase)?)));
    }
    Ok(AnchorSet::new(anchors)?)
}

/// Full demo asset bundle with the built-in protocol table.
pub fn demo_assets(cfg: &TriageConfig) -> Result<TriageAssets, BuildError> {
    let scorer = HashEmbeddingScorer::new(DEFAULT_STUB_DIM);
    Ok(TriageAssets {
        vocabulary: Arc::new(demo_vocabulary()?),
        labels: LabelSet::new(DEMO_LABELS.iter().copied())?,
        wordpiece_vocab: DEMO_WORDPIECE_VOCAB.iter().map(|t| t.to_string()).collect(),
        anchors: Arc::new(demo_anchors(&cfg.semantic, &scorer)?),
        protocols: Arc::new(ProtocolTable::builtin()?),
    })
}

/// Demo assets around arbitrary scorers.
pub fn demo_service_with(
    cfg: &TriageConfig,
    primary: impl Loader<dyn PrimaryScorer> + 'static,
    semantic: impl Loader<dyn EmbeddingScorer> + 'static,
) -> Result<TriageService, BuildError> {
    TriageService::new(cfg, demo_assets(cfg)?, primary, semantic)
}

/// Service over the keyword scorer and the hash embedder.
pub fn demo_service(cfg: &TriageConfig) -> Result<TriageService, BuildError> {
    let primary: Arc<dyn PrimaryScorer> = Arc::new(KeywordScorer::demo());
    let semantic: Arc<dyn EmbeddingScorer> =
        Arc::new(HashEmbeddingScorer::new(DEFAULT_STUB_DIM));
    demo_service_with(cfg, Preloaded::new(primary), Preloaded::new(semantic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_scores_sum_to_one() {
        let scorer = KeywordScorer::demo();
        let vocab = demo_vocabulary().unwrap();
        let ids = [vocab.lookup("chest"), vocab.lookup("breathe"), 1, 0];
        let scores = scorer.score(&ids);
        assert_eq!(scores.len(), DEMO_LABELS.len());
        assert!((scores.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        let chest = DEMO_LABELS.iter().position(|&l| l == "chest_pain").unwrap();
        assert!(scores[chest] > 0.8, "{scores:?}");
    }

    #[test]
    fn no_keywords_is_uniform() {
        let scores = KeywordScorer::demo().score(&[1, 1, 0, 0]);
        let expected = 1.0 / DEMO_LABELS.len() as f32;
        assert!(scores.iter().all(|s| (s - expected).abs() < 1e-6));
    }

    #[test]
    fn demo_tables_line_up() {
        let assets = demo_assets(&TriageConfig::default()).unwrap();
        assert_eq!(assets.labels.len(), DEMO_LABELS.len());
        assert_eq!(assets.anchors.len(), DEMO_EXEMPLARS.len());
        for label in DEMO_LABELS {
            assert!(assets.protocols.contains(label), "{label} has no protocol");
            assert!(assets.anchors.get(label).is_some(), "{label} has no anchor");
        }
    }

    #[tokio::test]
    async fn counting_loader_counts() {
        let loader: CountingLoader<dyn PrimaryScorer> = CountingLoader::failing("absent");
        let counter = loader.counter();
        assert!(loader.load().await.is_err());
        assert!(loader.load().await.is_err());
        assert_eq!(counter.get(), 2);
    }
}
