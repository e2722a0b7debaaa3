use std::fs;
use std::path::Path;

use super::error::ConfigError;
use super::format::ConfigFormat;
use super::types::CompareConfig;

fn example_config() -> CompareConfig {
    CompareConfig {
        models: vec![
            "gpt-4o-mini".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
            "gemini/gemini-1.5-flash".to_string(),
        ],
        ..CompareConfig::default()
    }
}

/// Writes an example config to `path`; the extension picks the format.
pub fn create_example_config(path: &Path) -> Result<(), ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let config = example_config();
    let contents = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(&config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
