//! Seams for the black-box inference engines.
//!
//! Neither scorer is implemented here. Callers wrap whatever runtime they
//! ship (TFLite, ONNX, a remote service, a test double) behind these traits
//! and hand a [`Loader`] for it to the adapter, which decides when to load.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ScorerError;

/// Fixed-length id sequence → per-label score vector.
#[async_trait]
pub trait PrimaryScorer: Send + Sync {
    async fn run(&self, input: &[u32]) -> Result<Vec<f32>, ScorerError>;

    /// Whether concurrent calls on the same instance are safe. Adapters
    /// serialize calls to scorers that return `false`.
    fn is_reentrant(&self) -> bool {
        true
    }
}

/// Fixed-length model inputs for the embedding scorer.
///
/// All three vectors have the same length (the embedding model's sequence
/// length); `token_type_ids` is all zeros for single-sentence input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl EmbeddingInput {
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }
}

/// Tokenized text → fixed-dimension embedding vector.
#[async_trait]
pub trait EmbeddingScorer: Send + Sync {
    async fn run(&self, input: &EmbeddingInput) -> Result<Vec<f32>, ScorerError>;

    fn is_reentrant(&self) -> bool {
        true
    }
}

/// Produces a loaded engine. Called at most once per [`EngineCell`](crate::EngineCell)
/// generation.
#[async_trait]
pub trait Loader<T: ?Sized + Send + Sync>: Send + Sync {
    async fn load(&self) -> Result<Arc<T>, ScorerError>;
}

/// Loader for an engine the caller already holds.
pub struct Preloaded<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Preloaded<T> {
    pub fn new(engine: Arc<T>) -> Self {
        Self(engine)
    }
}

#[async_trait]
impl<T: ?Sized + Send + Sync> Loader<T> for Preloaded<T> {
    async fn load(&self) -> Result<Arc<T>, ScorerError> {
        Ok(Arc::clone(&self.0))
    }
}

/// Loader backed by an async closure.
pub struct FnLoader<F>(F);

/// Wraps `f` as a [`Loader`].
///
/// ```rust
/// use std::sync::Arc;
/// use engine::{loader_fn, ScorerError};
///
/// let loader = loader_fn(|| async { Err::<Arc<str>, _>(ScorerError::new("no weights")) });
/// # let _ = loader;
/// ```
pub fn loader_fn<F>(f: F) -> FnLoader<F> {
    FnLoader(f)
}

#[async_trait]
impl<T, F, Fut> Loader<T> for FnLoader<F>
where
    T: ?Sized + Send + Sync,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Arc<T>, ScorerError>> + Send,
{
    async fn load(&self) -> Result<Arc<T>, ScorerError> {
        (self.0)().await
    }
}
