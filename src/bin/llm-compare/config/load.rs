use std::fs;
use std::path::Path;

use llm_compare::validate::validate_temperature;

use super::error::ConfigError;
use super::format::ConfigFormat;
use super::types::CompareConfig;

/// Reads and checks the config file at `path`.
pub fn load_config(path: &Path) -> Result<CompareConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(err) => return Err(ConfigError::Io(err)),
    };
    let config = parse_config(&contents, format)?;
    check_config(&config)?;
    Ok(config)
}

fn parse_config(contents: &str, format: ConfigFormat) -> Result<CompareConfig, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(CompareConfig::default());
    }
    Ok(match format {
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
        ConfigFormat::Json => serde_json::from_str(contents)?,
        ConfigFormat::Toml => toml::from_str(contents)?,
    })
}

fn check_config(config: &CompareConfig) -> Result<(), ConfigError> {
    validate_temperature(config.temperature).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    if !config.retry_delay.is_finite() || config.retry_delay < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "retry_delay must be a non-negative number of seconds, got {}",
            config.retry_delay
        )));
    }
    if config.max_concurrency == Some(0) {
        return Err(ConfigError::Invalid(
            "max_concurrency must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_overrides_defaults() {
        let file = write_temp(
            ".yaml",
            "models:\n  - gpt-4o\n  - claude-3-5-sonnet-20241022\ntemperature: 0.2\nmax_retries: 5\nunknown_key: 1\n",
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.models, vec!["gpt-4o", "claude-3-5-sonnet-20241022"]);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, 1.0);
        assert_eq!(config.timeout, 120);
        assert!(!config.stream);
    }

    #[test]
    fn json_and_toml_are_supported() {
        let json = write_temp(".json", r#"{"stream": true, "timeout": 30}"#);
        let config = load_config(json.path()).unwrap();
        assert!(config.stream);
        assert_eq!(config.timeout, 30);

        let toml = write_temp(
            ".toml",
            "base_url = \"http://gateway:4000\"\nretry_transient_only = true\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = load_config(toml.path()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://gateway:4000"));
        assert!(config.retry_transient_only);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotate_keep, 5);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_temp(".yml", "");
        assert_eq!(load_config(file.path()).unwrap(), CompareConfig::default());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".ini", "models = a");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == ".ini"));
    }

    #[test]
    fn out_of_range_temperature_is_invalid() {
        let file = write_temp(".yaml", "temperature: 1.5\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let file = write_temp(".yaml", "models: [unterminated\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }
}
