//! Engine plumbing shared by the primary and semantic adapters.
//!
//! Both inference engines are black boxes injected by the caller. This crate
//! owns the parts around them that have to behave the same for both:
//!
//! - [`PrimaryScorer`] / [`EmbeddingScorer`]: the async seams a runtime is
//!   wrapped behind
//! - [`Loader`]: how a scorer is produced, so loading can be lazy and retried
//! - [`EngineCell`]: one load attempt per engine, shared by every concurrent
//!   caller, with the outcome cached until [`EngineCell::reset`]
//! - [`CallGate`] and [`bounded_call`]: call serialization for
//!   non-reentrant scorers and per-call time limits
//! - [`ClassificationResult`]: the `(label, confidence)` pair both adapters
//!   return
//! - [`EngineError`]: `ModelUnavailable` vs `Inference`, the split the router
//!   uses to decide on fallback
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use engine::{EngineCell, EngineKind, Preloaded, PrimaryScorer, ScorerError};
//!
//! struct Constant;
//!
//! #[async_trait]
//! impl PrimaryScorer for Constant {
//!     async fn run(&self, _input: &[u32]) -> Result<Vec<f32>, ScorerError> {
//!         Ok(vec![0.1, 0.9])
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let scorer: Arc<dyn PrimaryScorer> = Arc::new(Constant);
//! let cell = EngineCell::new(EngineKind::Primary, Preloaded::new(scorer));
//! let loaded = cell.get().await.unwrap();
//! assert_eq!(loaded.run(&[0; 15]).await.unwrap(), vec![0.1, 0.9]);
//! # });
//! ```

mod cell;
mod error;
mod guard;
mod result;
mod scorer;

pub use crate::cell::{EngineCell, EngineState};
pub use crate::error::{EngineError, EngineKind, LoadError, ScorerError};
pub use crate::guard::{bounded_call, CallGate};
pub use crate::result::{ClassificationResult, Source};
pub use crate::scorer::{
    loader_fn, EmbeddingInput, EmbeddingScorer, FnLoader, Loader, Preloaded, PrimaryScorer,
};
