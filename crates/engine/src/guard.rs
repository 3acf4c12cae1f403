use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::{EngineError, EngineKind, ScorerError};

/// Serializes calls into scorers that are not safe to re-enter.
///
/// Reentrant scorers pass straight through; only non-reentrant ones queue
/// on the gate's mutex.
#[derive(Debug, Default)]
pub struct CallGate {
    lock: Mutex<()>,
}

impl CallGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, R>(&self, reentrant: bool, call: F) -> R
    where
        F: Future<Output = R>,
    {
        if reentrant {
            return call.await;
        }
        let _guard = self.lock.lock().await;
        call.await
    }
}

/// Awaits a scorer call, optionally bounded by `limit`.
///
/// Scorer failures and elapsed limits both come back as
/// [`EngineError::Inference`] for `engine`. Adapters pass the whole
/// [`CallGate::run`] future here, so the limit also covers time spent queued
/// behind a non-reentrant scorer.
pub async fn bounded_call<F, T>(
    engine: EngineKind,
    limit: Option<Duration>,
    call: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, ScorerError>>,
{
    let outcome = match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(EngineError::inference(
                    engine,
                    format!("timed out after {}ms", limit.as_millis()),
                ))
            }
        },
        None => call.await,
    };
    outcome.map_err(|err| EngineError::inference(engine, err.to_string()))
}
