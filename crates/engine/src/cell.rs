use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{EngineKind, LoadError};
use crate::scorer::Loader;

type Resolved<T> = Result<Arc<T>, LoadError>;

/// Observable state of an [`EngineCell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// No load attempt has resolved yet (one may be in flight).
    Uninitialized,
    Ready,
    /// The last attempt failed. Stays failed until [`EngineCell::reset`].
    Failed(LoadError),
}

/// One-shot, race-guarded holder for a lazily loaded engine.
///
/// The first caller of [`get`](Self::get) runs the loader; callers arriving
/// while that load is in flight wait for it and share its outcome. The
/// outcome is cached whether it succeeded or failed, so a broken model is
/// not reloaded on every request. [`reset`](Self::reset) discards the cached
/// outcome and lets the next caller try again.
///
/// Each engine owns its own cell; two cells never wait on each other.
pub struct EngineCell<T: ?Sized + Send + Sync + 'static> {
    engine: EngineKind,
    loader: Box<dyn Loader<T>>,
    slot: RwLock<Arc<OnceCell<Resolved<T>>>>,
    attempts: AtomicUsize,
}

impl<T: ?Sized + Send + Sync + 'static> EngineCell<T> {
    pub fn new(engine: EngineKind, loader: impl Loader<T> + 'static) -> Self {
        Self {
            engine,
            loader: Box::new(loader),
            slot: RwLock::new(Arc::new(OnceCell::new())),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Returns the loaded engine, loading it on first use.
    pub async fn get(&self) -> Result<Arc<T>, LoadError> {
        let cell = self.current();
        let resolved = cell.get_or_init(|| self.load()).await;
        resolved.clone()
    }

    /// Cached outcome, without triggering a load.
    pub fn peek(&self) -> Option<Result<Arc<T>, LoadError>> {
        self.current().get().cloned()
    }

    pub fn state(&self) -> EngineState {
        match self.peek() {
            None => EngineState::Uninitialized,
            Some(Ok(_)) => EngineState::Ready,
            Some(Err(err)) => EngineState::Failed(err),
        }
    }

    /// Forgets the cached outcome. A load already in flight finishes against
    /// the old generation and its result is not observed by later callers.
    pub fn reset(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(OnceCell::new());
        info!(engine = %self.engine, "engine_reset");
    }

    /// Number of loader invocations since construction.
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn kind(&self) -> EngineKind {
        self.engine
    }

    fn current(&self) -> Arc<OnceCell<Resolved<T>>> {
        let guard = self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    async fn load(&self) -> Resolved<T> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();
        match self.loader.load().await {
            Ok(engine) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(engine = %self.engine, attempt, elapsed_micros, "engine_load_success");
                Ok(engine)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(
                    engine = %self.engine,
                    attempt,
                    error = %err,
                    elapsed_micros,
                    "engine_load_failure"
                );
                Err(LoadError {
                    engine: self.engine,
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> std::fmt::Debug for EngineCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCell")
            .field("engine", &self.engine)
            .field("state", &self.state())
            .field("attempts", &self.load_attempts())
            .finish()
    }
}
