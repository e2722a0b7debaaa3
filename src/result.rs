use serde::{Deserialize, Serialize};

use crate::chat::Usage;
use crate::pricing::estimate_cost;

/// Outcome of one model call within a batch.
///
/// Exactly one of `response` and `error` is set. Fields are private so the
/// constructors are the only way to build one; deserializing checks the same
/// rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelResult")]
pub struct ModelResult {
    model: String,
    response: Option<String>,
    error: Option<String>,
    response_time: Option<f64>,
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
    estimated_cost: Option<f64>,
}

/// Unchecked wire form of [`ModelResult`].
#[derive(Deserialize)]
struct RawModelResult {
    model: String,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    response_time: Option<f64>,
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
    #[serde(default)]
    estimated_cost: Option<f64>,
}

impl TryFrom<RawModelResult> for ModelResult {
    type Error = String;

    fn try_from(raw: RawModelResult) -> Result<Self, Self::Error> {
        let has_metrics = raw.response_time.is_some()
            || raw.prompt_tokens.is_some()
            || raw.completion_tokens.is_some()
            || raw.total_tokens.is_some()
            || raw.estimated_cost.is_some();
        match (&raw.response, &raw.error) {
            (Some(_), Some(_)) => {
                return Err(format!("{}: both response and error are set", raw.model))
            }
            (None, None) => {
                return Err(format!("{}: neither response nor error is set", raw.model))
            }
            (None, Some(_)) if has_metrics => {
                return Err(format!("{}: a failed call carries metrics", raw.model))
            }
            _ => {}
        }
        if raw.estimated_cost.is_some()
            && (raw.prompt_tokens.is_none() || raw.completion_tokens.is_none())
        {
            return Err(format!(
                "{}: cost is set without both token counts",
                raw.model
            ));
        }
        Ok(Self {
            model: raw.model,
            response: raw.response,
            error: raw.error,
            response_time: raw.response_time,
            prompt_tokens: raw.prompt_tokens,
            completion_tokens: raw.completion_tokens,
            total_tokens: raw.total_tokens,
            estimated_cost: raw.estimated_cost,
        })
    }
}

impl ModelResult {
    /// A successful call. The cost is derived from `model` and `usage`.
    pub fn success(
        model: impl Into<String>,
        response: impl Into<String>,
        response_time: f64,
        usage: Option<Usage>,
    ) -> Self {
        let model = model.into();
        let prompt_tokens = usage.map(|u| u.prompt_tokens);
        let completion_tokens = usage.map(|u| u.completion_tokens);
        let estimated_cost = estimate_cost(&model, prompt_tokens, completion_tokens);
        Self {
            response: Some(response.into()),
            error: None,
            response_time: Some(response_time),
            prompt_tokens,
            completion_tokens,
            total_tokens: usage.map(|u| u.total_tokens),
            estimated_cost,
            model,
        }
    }

    /// A failed call; no metric is kept.
    pub fn failure(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            response: None,
            error: Some(error.into()),
            response_time: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            estimated_cost: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Wall-clock seconds for the call.
    pub fn response_time(&self) -> Option<f64> {
        self.response_time
    }

    pub fn prompt_tokens(&self) -> Option<u32> {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> Option<u32> {
        self.completion_tokens
    }

    pub fn total_tokens(&self) -> Option<u32> {
        self.total_tokens
    }

    /// Estimated USD cost.
    pub fn estimated_cost(&self) -> Option<f64> {
        self.estimated_cost
    }
}
