use clap::Parser;
use std::path::PathBuf;

use llm_compare::export::ExportFormat;

use crate::presets::Preset;

#[derive(Parser, Debug)]
#[command(
    name = "llm-compare",
    version,
    about = "Compare responses from multiple LLM models",
    after_help = "Without --prompt the tool starts an interactive session.\n\
                  Every model is called through the gateway with LITELLM_API_KEY."
)]
pub struct CliArgs {
    /// Prompt to send to all models
    #[arg(long, short = 'p')]
    pub prompt: Option<String>,
    /// Models to compare (overrides preset and config)
    #[arg(long, short = 'm', num_args = 1..)]
    pub models: Vec<String>,
    /// Use a preset model list
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
    /// Temperature for responses (0-1)
    #[arg(long, short = 't')]
    pub temperature: Option<f32>,
    /// System prompt for all models
    #[arg(long, short = 's')]
    pub system_prompt: Option<String>,
    /// Export results to file (json/csv/md)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Export format, detected from the extension when omitted
    #[arg(long, value_parser = ["json", "csv", "markdown"])]
    pub export_format: Option<String>,
    /// Path to a YAML, JSON or TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write an example config file and exit
    #[arg(long, value_name = "PATH")]
    pub create_config: Option<PathBuf>,
    /// Stream responses
    #[arg(long)]
    pub stream: bool,
    /// Also display a summary table
    #[arg(long)]
    pub table: bool,
    /// Gateway base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl CliArgs {
    /// Export format requested explicitly, if any.
    pub fn export_format(&self) -> Option<ExportFormat> {
        self.export_format.as_deref().and_then(|f| f.parse().ok())
    }
}
