use std::path::PathBuf;

/// `~/.local/share/llm-compare/logs`, or a temp directory without a home.
pub fn default_logs_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".local").join("share").join("llm-compare"))
        .unwrap_or_else(|| std::env::temp_dir().join("llm-compare"))
        .join("logs")
}
