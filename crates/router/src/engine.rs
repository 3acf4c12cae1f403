use std::sync::Arc;
use std::time::Instant;

use engine::{ClassificationResult, EngineError, EngineState};
use tracing::{info, warn, Instrument, Level};

use crate::engines::IntentEngine;
use crate::types::{
    ClassificationError, EngineInitError, InvalidRouterConfig, RouteDecision, RoutePath,
    RouterConfig, RouterState,
};


/// Where a routing pass currently is, with the data that state carries.
enum Step {
    Idle,
    PrimaryAttempted(Result<ClassificationResult, EngineError>),
    Accepted(ClassificationResult),
    FallbackAttempted {
        primary: Result<ClassificationResult, EngineError>,
    },
    Resolved(Result<(ClassificationResult, RoutePath), ClassificationError>),
}

impl Step {
    fn state(&self) -> RouterState {
        match self {
            Step::Idle => RouterState::Idle,
            Step::PrimaryAttempted(_) => RouterState::PrimaryAttempted,
            Step::Accepted(_) => RouterState::Accepted,
            Step::FallbackAttempted { .. } => RouterState::FallbackAttempted,
            Step::Resolved(_) => RouterState::Resolved,
        }
    }
}

/// Hybrid router: trust a confident primary result, otherwise ask the
/// semantic engine, and degrade to the weak primary result if that fails.
pub struct Router {
    primary: Arc<dyn IntentEngine>,
    semantic: Arc<dyn IntentEngine>,
    cfg: RouterConfig,
}

impl Router {
    pub fn new(
        primary: Arc<dyn IntentEngine>,
        semantic: Arc<dyn IntentEngine>,
        cfg: RouterConfig,
    ) -> Result<Self, InvalidRouterConfig> {
        cfg.validate()?;
        Ok(Self {
            primary,
            semantic,
            cfg,
        })
    }

    /// Loads both engines concurrently. A failure in one does not stop or
    /// delay the other.
    pub async fn warm_up(&self) -> Result<(), EngineInitError> {
        let (primary, semantic) = tokio::join!(self.primary.warm_up(), self.semantic.warm_up());
        if let Err(err) = &primary {
            warn!(error = %err, "primary_warm_up_failure");
        }
        if let Err(err) = &semantic {
            warn!(error = %err, "semantic_warm_up_failure");
        }
        EngineInitError::from_results(primary, semantic)
    }

    /// Classifies `text`, returning only the winning result.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationError> {
        self.route(text).await.map(|decision| decision.result)
    }

    /// Runs one routing pass and records every state it visits.
    pub async fn route(&self, text: &str) -> Result<RouteDecision, ClassificationError> {
        let span = tracing::span!(Level::INFO, "router.route", text_len = text.len());
        self.run(text).instrument(span).await
    }

    async fn run(&self, text: &str) -> Result<RouteDecision, ClassificationError> {
        let start = Instant::now();
        let mut step = Step::Idle;
        let mut trace = vec![step.state()];
        let outcome = loop {
            step = match step {
                Step::Idle => Step::PrimaryAttempted(self.primary.classify(text).await),
                Step::PrimaryAttempted(Ok(res)) if res.confidence > self.cfg.primary_threshold => {
                    Step::Accepted(res)
                }
                Step::PrimaryAttempted(primary) => {
                    match &primary {
                        Ok(res) => info!(
                            label = %res.label,
                            confidence = res.confidence,
                            threshold = self.cfg.primary_threshold,
                            "primary_below_threshold"
                        ),
                        Err(err) => warn!(error = %err, "primary_failure"),
                    }
                    Step::FallbackAttempted { primary }
                }
                Step::Accepted(res) => Step::Resolved(Ok((res, RoutePath::Primary))),
                Step::FallbackAttempted { primary } => {
                    Step::Resolved(self.fall_back(text, primary).await)
                }
                Step::Resolved(outcome) => break outcome,
            };
            trace.push(step.state());
        };

        let elapsed_micros = start.elapsed().as_micros();
        match outcome {
            Ok((result, path)) => {
                info!(
                    label = %result.label,
                    confidence = result.confidence,
                    path = ?path,
                    elapsed_micros,
                    "router_resolved"
                );
                Ok(RouteDecision {
                    result,
                    path,
                    trace,
                })
            }
            Err(err) => {
                warn!(error = %err, elapsed_micros, "router_unavailable");
                Err(err)
            }
        }
    }

    async fn fall_back(
        &self,
        text: &str,
        primary: Result<ClassificationResult, EngineError>,
    ) -> Result<(ClassificationResult, RoutePath), ClassificationError> {
        match self.semantic.classify(text).await {
            Ok(res) => Ok((res, RoutePath::Semantic)),
            Err(semantic) => {
                warn!(error = %semantic, "semantic_failure");
                match primary {
                    Ok(res) => Ok((res, RoutePath::DegradedPrimary)),
                    Err(primary) => {
                        Err(ClassificationError::BothEnginesUnavailable { primary, semantic })
                    }
                }
            }
        }
    }

    /// Drops both engines' cached load outcomes.
    pub fn reset(&self) {
        self.primary.reset();
        self.semantic.reset();
    }

    pub fn engine_states(&self) -> (EngineState, EngineState) {
        (self.primary.state(), self.semantic.state())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.cfg
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("primary", &self.primary.state())
            .field("semantic", &self.semantic.state())
            .field("cfg", &self.cfg)
            .finish()
    }
}
