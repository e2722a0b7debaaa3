use crate::error::ValidationError;
use crate::validate::{validate_prompt, validate_temperature, PromptKind};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One prompt dispatched to a set of models.
///
/// Model order is significant and duplicates are allowed; results come back
/// in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBatch {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub models: Vec<String>,
    pub temperature: f32,
    pub stream: bool,
}

impl RequestBatch {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            models: Vec::new(),
            temperature: DEFAULT_TEMPERATURE,
            stream: false,
        }
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn system_prompt(mut self, system_prompt: Option<impl Into<String>>) -> Self {
        self.system_prompt = system_prompt
            .map(Into::into)
            .filter(|s: &String| !s.is_empty());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Checks prompt, system prompt (when non-empty) and temperature.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_prompt(&self.prompt, PromptKind::Prompt)?;
        if let Some(system) = self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            validate_prompt(system, PromptKind::SystemPrompt)?;
        }
        validate_temperature(self.temperature)
    }
}
