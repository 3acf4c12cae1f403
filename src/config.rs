//! YAML configuration for the triage service.
//!
//! One document configures every stage. Each section is optional and falls
//! back to that stage's defaults, so an empty file with just a `version`
//! yields the stock pipeline.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "clinic-kiosk"
//!
//! lexical:
//!   normalize_unicode: true
//!   singularize: true
//!   max_sequence_length: 15
//!
//! classifier:
//!   timeout_ms: 250
//!
//! semantic:
//!   max_sequence_length: 128
//!   add_special_tokens: true
//!   timeout_ms: 500
//!
//! router:
//!   primary_threshold: 0.65
//!
//! knowledge:
//!   safety_threshold: 0.65
//!   triage_overrides:
//!     cut: urgent
//! ```

use std::fs;
use std::path::Path;

use classifier::ClassifierConfig;
use knowledge::KnowledgeConfig;
use lexical::LexicalConfig;
use router::RouterConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable the demo binary reads the config path from.
pub const CONFIG_ENV_VAR: &str = "TRIAGE_CONFIG";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole triage pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TriageConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub lexical: LexicalConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl TriageConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: TriageConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the version and every stage's settings.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.lexical
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("lexical: {err}")))?;
        self.semantic
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("semantic: {err}")))?;
        self.router
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("router: {err}")))?;
        self.knowledge
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("knowledge: {err}")))?;
        if self.classifier.timeout_ms == Some(0) {
            return Err(ConfigLoadError::Validation(
                "classifier.timeout_ms must be >= 1".to_string(),
            ));
        }
        if self.semantic.timeout_ms == Some(0) {
            return Err(ConfigLoadError::Validation(
                "semantic.timeout_ms must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            lexical: LexicalConfig::default(),
            classifier: ClassifierConfig::default(),
            semantic: SemanticConfig::default(),
            router: RouterConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}
