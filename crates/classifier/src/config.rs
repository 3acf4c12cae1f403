use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime options for the primary classifier adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Upper bound for a single scorer call, in milliseconds, including any
    /// wait for a non-reentrant scorer to come free. `None` waits
    /// indefinitely.
    pub timeout_ms: Option<u64>,
}

impl ClassifierConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
