use std::path::PathBuf;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::config::{default_logs_dir, LoggingConfig};

/// Starts file logging. `RUST_LOG` wins over the configured level.
///
/// The returned handle must stay alive for the lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggerHandle> {
    let log_path = config
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_logs_dir().join("llm-compare.log"));
    let directory = log_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(default_logs_dir);
    let basename = log_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("llm-compare")
        .to_string();
    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    Ok(handle)
}
