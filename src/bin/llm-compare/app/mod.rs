mod interactive;
mod settings;
mod single;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use llm_compare::backends::gateway::Gateway;
use llm_compare::executor::ModelExecutor;
use llm_compare::{ModelComparator, ModelResult, ProgressEvent, RequestBatch};

use crate::args::CliArgs;
use crate::config::{create_example_config, load_config, CompareConfig};
use crate::display;
use crate::logging::init_logging;

use settings::{ModelSource, Settings};

const API_KEY_ENV: &str = "LITELLM_API_KEY";
const BASE_URL_ENV: &str = "LITELLM_BASE_URL";

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if let Some(path) = &args.create_config {
        create_example_config(path)
            .with_context(|| format!("failed to create config at {}", path.display()))?;
        display::success(&format!("Example config created at: {}", path.display()));
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => CompareConfig::default(),
    };
    let _logger = init_logging(&config.logging)?;

    let settings = Settings::resolve(&args, &config, env::var(BASE_URL_ENV).ok())?;
    if let ModelSource::Preset(preset) = settings.model_source {
        display::info(&format!("Using {} preset models", preset.name()));
    }

    let api_key = api_key_from_env()?;
    let gateway = Gateway::new(api_key, settings.base_url.clone())?;
    log::info!("Using gateway at {}", gateway.base_url());
    let executor = ModelExecutor::new(Arc::new(gateway), settings.retry.clone())
        .timeout(Some(settings.timeout));
    let comparator = ModelComparator::new(executor).max_concurrency(settings.max_concurrency);

    match &args.prompt {
        Some(prompt) => single::run(&comparator, &settings, &args, prompt).await,
        None => {
            if args.output.is_some() {
                display::warn("Warning: Export is only supported in single-prompt mode");
            }
            interactive::run(&comparator, &settings).await
        }
    }
}

fn api_key_from_env() -> anyhow::Result<String> {
    match env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => anyhow::bail!(
            "{API_KEY_ENV} not found in environment variables.\n   \
             Set it with: export {API_KEY_ENV}='your_key_here'"
        ),
    }
}

/// Runs one batch while printing progress as each model finishes.
async fn compare_with_progress(
    comparator: &ModelComparator,
    batch: &RequestBatch,
) -> anyhow::Result<Vec<ModelResult>> {
    display::header(
        &batch.prompt,
        batch.system_prompt.as_deref(),
        batch.models.len(),
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let compare = async move {
        let tx = tx;
        comparator.compare_models_with_progress(batch, Some(&tx)).await
    };
    let (results, ()) = tokio::join!(compare, print_progress(rx));
    Ok(results?)
}

async fn print_progress(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        display::progress(&event);
    }
}

fn batch_for(settings: &Settings, prompt: &str) -> RequestBatch {
    RequestBatch::new(prompt)
        .models(settings.models.iter().cloned())
        .system_prompt(settings.system_prompt.clone())
        .temperature(settings.temperature)
        .stream(settings.stream)
}
