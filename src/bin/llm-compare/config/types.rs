use serde::{Deserialize, Serialize};

use llm_compare::compare::DEFAULT_TEMPERATURE;

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

/// Settings read from a config file. Unknown keys are ignored and missing
/// ones keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompareConfig {
    pub models: Vec<String>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub max_retries: usize,
    /// Base backoff delay in seconds
    pub retry_delay: f64,
    /// Per-call timeout in seconds
    pub timeout: u64,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    pub retry_transient_only: bool,
    pub logging: LoggingConfig,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY_SECS,
            timeout: DEFAULT_TIMEOUT_SECS,
            stream: false,
            base_url: None,
            max_concurrency: None,
            retry_transient_only: false,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}
