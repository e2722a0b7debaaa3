//! One model call with timing, usage, cost and error capture.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;

use crate::chat::{ChatMessage, CompletionProvider, CompletionRequest, Usage};
use crate::error::GatewayError;
use crate::resilient::{ResilienceConfig, ResilientProvider};
use crate::result::ModelResult;

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Executes single model calls against a provider.
///
/// The retry policy wraps only the outbound call. Whatever error is left after
/// the last attempt becomes the result's `error`; `call` itself never fails.
pub struct ModelExecutor {
    provider: ResilientProvider,
    timeout: Option<Duration>,
}

impl ModelExecutor {
    pub fn new(provider: Arc<dyn CompletionProvider>, retry: ResilienceConfig) -> Self {
        Self {
            provider: ResilientProvider::new(provider, retry),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Sets the per-call timeout; `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Calls `model` once (plus retries) and records the outcome.
    ///
    /// Streaming responses are accumulated into one string; usage and cost
    /// are not available for them.
    pub async fn call(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        system_prompt: Option<&str>,
        stream: bool,
    ) -> ModelResult {
        let request = CompletionRequest {
            model: model.to_string(),
            messages: ChatMessage::conversation(system_prompt, prompt),
            temperature,
            timeout: self.timeout,
        };

        let start = Instant::now();
        let outcome = if stream {
            self.call_streaming(&request).await
        } else {
            self.call_once(&request).await
        };
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok((text, usage)) => {
                log::debug!("{model} answered in {elapsed:.2}s");
                ModelResult::success(model, text, elapsed, usage)
            }
            Err(err) => {
                log::warn!("{model} failed after {elapsed:.2}s: {err}");
                ModelResult::failure(model, err.to_string())
            }
        }
    }

    async fn call_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<(String, Option<Usage>), GatewayError> {
        let completion = self.provider.complete(request).await?;
        Ok((completion.text().unwrap_or_default(), completion.usage()))
    }

    async fn call_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<(String, Option<Usage>), GatewayError> {
        let mut stream = self.provider.complete_stream(request).await?;
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(content) = chunk.content() {
                text.push_str(content);
            }
        }
        Ok((text, None))
    }
}
