use async_trait::async_trait;
use classifier::PrimaryClassifier;
use engine::{ClassificationResult, EngineError, EngineKind, EngineState, LoadError};
use semantic::SemanticMatcher;

/// One classification path as the router sees it.
///
/// Implemented for [`PrimaryClassifier`] and [`SemanticMatcher`]; tests
/// substitute scripted engines.
#[async_trait]
pub trait IntentEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    async fn warm_up(&self) -> Result<(), LoadError>;

    async fn classify(&self, text: &str) -> Result<ClassificationResult, EngineError>;

    /// Forgets a cached load outcome so the next call loads again.
    fn reset(&self);

    fn state(&self) -> EngineState;
}

#[async_trait]
impl IntentEngine for PrimaryClassifier {
    fn kind(&self) -> EngineKind {
        EngineKind::Primary
    }

    async fn warm_up(&self) -> Result<(), LoadError> {
        PrimaryClassifier::warm_up(self).await
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult, EngineError> {
        self.classify_text(text).await
    }

    fn reset(&self) {
        PrimaryClassifier::reset(self)
    }

    fn state(&self) -> EngineState {
        PrimaryClassifier::state(self)
    }
}

#[async_trait]
impl IntentEngine for SemanticMatcher {
    fn kind(&self) -> EngineKind {
        EngineKind::Semantic
    }

    async fn warm_up(&self) -> Result<(), LoadError> {
        SemanticMatcher::warm_up(self).await
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult, EngineError> {
        SemanticMatcher::classify(self, text).await
    }

    fn reset(&self) {
        SemanticMatcher::reset(self)
    }

    fn state(&self) -> EngineState {
        SemanticMatcher::state(self)
    }
}
