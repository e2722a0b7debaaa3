use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use crate::chat::{ChatCompletion, CompletionProvider, CompletionRequest, CompletionStream};
use crate::error::GatewayError;

use super::config::{ResilienceConfig, RetryOn};

/// Retries the outbound call of a provider using exponential backoff.
///
/// Only opening the call is retried. A stream that fails half way through is
/// not restarted.
pub struct ResilientProvider {
    inner: Arc<dyn CompletionProvider>,
    cfg: ResilienceConfig,
}

impl ResilientProvider {
    /// Creates a new resilient wrapper around an existing provider.
    pub fn new(inner: Arc<dyn CompletionProvider>, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.cfg
    }

    /// Runs `op` until it succeeds or the attempts run out, returning the last
    /// error untouched.
    pub async fn retry<F, Fut, T>(&self, label: &str, mut op: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let attempts = self.cfg.attempts();
        let mut idx = 0usize;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if idx + 1 >= attempts || !self.should_retry(&err) {
                        return Err(err);
                    }
                    let delay = self.delay_for(idx);
                    log::warn!(
                        "{label}: attempt {}/{} failed ({err}), retrying in {:?}",
                        idx + 1,
                        attempts,
                        delay
                    );
                    sleep(delay).await;
                    idx += 1;
                }
            }
        }
    }

    fn should_retry(&self, err: &GatewayError) -> bool {
        match self.cfg.retry_on {
            RetryOn::AnyError => true,
            RetryOn::Transient => err.is_retryable(),
        }
    }

    fn delay_for(&self, attempt_index: usize) -> std::time::Duration {
        let delay = self.cfg.backoff_delay(attempt_index);
        if !self.cfg.jitter {
            return delay;
        }
        let span = (delay / 2).as_millis() as u64;
        let jitter = rand::thread_rng().gen_range(0..=span);
        delay.saturating_sub(std::time::Duration::from_millis(jitter))
    }
}

#[async_trait]
impl CompletionProvider for ResilientProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, GatewayError> {
        self.retry(&request.model, || self.inner.complete(request))
            .await
    }

    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionStream, GatewayError> {
        self.retry(&request.model, || self.inner.complete_stream(request))
            .await
    }
}
