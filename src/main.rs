use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use triage::demo_utils::demo_service;
use triage::{TriageConfig, CONFIG_ENV_VAR};

const DEFAULT_TEXT: &str = "My chest really hurts and I can't breathe";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = match env::var(CONFIG_ENV_VAR) {
        Ok(path) => TriageConfig::from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => TriageConfig::default(),
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let text = if args.is_empty() {
        DEFAULT_TEXT.to_string()
    } else {
        args.join(" ")
    };

    let service = demo_service(&config).context("building demo service")?;
    if let Err(err) = service.initialize().await {
        tracing::warn!(error = %err, "engine_initialization_incomplete");
    }

    match service.assess(&text).await {
        Ok(assessment) => {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Err(err) => {
            tracing::error!(error = %err, "classification_failed");
            println!("{}", err.user_message());
        }
    }

    Ok(())
}
