use std::time::Duration;

use anyhow::bail;

use llm_compare::backends::gateway::DEFAULT_BASE_URL;
use llm_compare::resilient::{ResilienceConfig, RetryOn};
use llm_compare::validate::{validate_prompt, validate_temperature, PromptKind};

use crate::args::CliArgs;
use crate::config::CompareConfig;
use crate::presets::Preset;

/// Where the model list came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModelSource {
    Flag,
    Preset(Preset),
    Config,
    Default,
}

/// Effective run settings after merging flags, config and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub models: Vec<String>,
    pub model_source: ModelSource,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub stream: bool,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: ResilienceConfig,
    pub max_concurrency: Option<usize>,
}

impl Settings {
    pub fn resolve(
        args: &CliArgs,
        config: &CompareConfig,
        env_base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let (models, model_source) = if !args.models.is_empty() {
            (args.models.clone(), ModelSource::Flag)
        } else if let Some(preset) = args.preset {
            (preset.models(), ModelSource::Preset(preset))
        } else if !config.models.is_empty() {
            (config.models.clone(), ModelSource::Config)
        } else {
            (Preset::Default.models(), ModelSource::Default)
        };
        if models.is_empty() {
            bail!("No models specified. Use --models, --preset or a config file");
        }

        let temperature = args.temperature.unwrap_or(config.temperature);
        validate_temperature(temperature)?;

        let system_prompt = args
            .system_prompt
            .clone()
            .or_else(|| config.system_prompt.clone())
            .filter(|s| !s.is_empty());
        if let Some(system) = &system_prompt {
            validate_prompt(system, PromptKind::SystemPrompt)?;
        }

        let base_url = args
            .base_url
            .clone()
            .or_else(|| config.base_url.clone())
            .or(env_base_url.filter(|u| !u.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let retry_on = if config.retry_transient_only {
            RetryOn::Transient
        } else {
            RetryOn::AnyError
        };

        Ok(Self {
            models,
            model_source,
            temperature,
            system_prompt,
            stream: args.stream || config.stream,
            base_url,
            timeout: Duration::from_secs(config.timeout),
            retry: ResilienceConfig::from_settings(config.max_retries, config.retry_delay)
                .retry_on(retry_on),
            max_concurrency: config.max_concurrency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("llm-compare").chain(extra.iter().copied()))
            .unwrap()
    }

    fn config_with_models() -> CompareConfig {
        CompareConfig {
            models: vec!["from-config".to_string()],
            temperature: 0.4,
            ..CompareConfig::default()
        }
    }

    #[test]
    fn model_flag_beats_everything() {
        let settings = Settings::resolve(
            &args(&["-m", "a", "b", "--preset", "fast"]),
            &config_with_models(),
            None,
        )
        .unwrap();
        assert_eq!(settings.models, vec!["a", "b"]);
        assert_eq!(settings.model_source, ModelSource::Flag);
    }

    #[test]
    fn preset_beats_config() {
        let settings =
            Settings::resolve(&args(&["--preset", "coding"]), &config_with_models(), None)
                .unwrap();
        assert_eq!(settings.models, Preset::Coding.models());
        assert_eq!(settings.model_source, ModelSource::Preset(Preset::Coding));
    }

    #[test]
    fn config_models_beat_default_preset() {
        let settings = Settings::resolve(&args(&[]), &config_with_models(), None).unwrap();
        assert_eq!(settings.models, vec!["from-config"]);
        assert_eq!(settings.temperature, 0.4);

        let settings = Settings::resolve(&args(&[]), &CompareConfig::default(), None).unwrap();
        assert_eq!(settings.models, Preset::Default.models());
        assert_eq!(settings.model_source, ModelSource::Default);
        assert_eq!(settings.temperature, 0.7);
    }

    #[test]
    fn temperature_flag_beats_config_and_is_checked() {
        let settings =
            Settings::resolve(&args(&["-t", "0.0"]), &config_with_models(), None).unwrap();
        assert_eq!(settings.temperature, 0.0);

        assert!(Settings::resolve(&args(&["-t", "1.5"]), &config_with_models(), None).is_err());
    }

    #[test]
    fn base_url_precedence() {
        let config = CompareConfig {
            base_url: Some("http://config:4000".to_string()),
            ..CompareConfig::default()
        };
        let env = Some("http://env:4000".to_string());

        let flag = Settings::resolve(&args(&["--base-url", "http://flag:4000"]), &config, env.clone())
            .unwrap();
        assert_eq!(flag.base_url, "http://flag:4000");

        let from_config = Settings::resolve(&args(&[]), &config, env.clone()).unwrap();
        assert_eq!(from_config.base_url, "http://config:4000");

        let from_env = Settings::resolve(&args(&[]), &CompareConfig::default(), env).unwrap();
        assert_eq!(from_env.base_url, "http://env:4000");

        let fallback = Settings::resolve(&args(&[]), &CompareConfig::default(), None).unwrap();
        assert_eq!(fallback.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn retry_settings_follow_config() {
        let config = CompareConfig {
            max_retries: 5,
            retry_delay: 0.5,
            retry_transient_only: true,
            ..CompareConfig::default()
        };
        let settings = Settings::resolve(&args(&[]), &config, None).unwrap();

        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.base_delay_ms, 500);
        assert_eq!(settings.retry.retry_on, RetryOn::Transient);
        assert_eq!(settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn invalid_system_prompt_is_rejected() {
        assert!(Settings::resolve(&args(&["-s", "a\0b"]), &CompareConfig::default(), None).is_err());
    }
}
