use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, Semaphore};

use crate::error::ValidationError;
use crate::executor::ModelExecutor;
use crate::result::ModelResult;

use super::batch::RequestBatch;

/// Sent once per finished call, in completion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Position of the model in the batch
    pub index: usize,
    pub model: String,
    /// Calls finished so far, this one included
    pub completed: usize,
    pub total: usize,
    pub success: bool,
    pub response_time: Option<f64>,
    pub total_tokens: Option<u32>,
    pub error: Option<String>,
}

impl ProgressEvent {
    fn new(index: usize, completed: usize, total: usize, result: &ModelResult) -> Self {
        Self {
            index,
            model: result.model().to_string(),
            completed,
            total,
            success: result.is_success(),
            response_time: result.response_time(),
            total_tokens: result.total_tokens(),
            error: result.error().map(str::to_string),
        }
    }
}

/// Runs one batch against every requested model concurrently.
pub struct ModelComparator {
    executor: Arc<ModelExecutor>,
    limiter: Option<Arc<Semaphore>>,
}

impl ModelComparator {
    pub fn new(executor: ModelExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
            limiter: None,
        }
    }

    /// Caps the number of calls in flight. Unbounded by default.
    pub fn max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.limiter = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    /// Compares all models of `batch`; see [`Self::compare_models_with_progress`].
    pub async fn compare_models(
        &self,
        batch: &RequestBatch,
    ) -> Result<Vec<ModelResult>, ValidationError> {
        self.compare_models_with_progress(batch, None).await
    }

    /// Validates the batch, calls every model concurrently and returns one
    /// result per model in input order.
    ///
    /// A failing model never cancels the others. `progress` receives an event
    /// as each call finishes; that order is unrelated to the returned order.
    pub async fn compare_models_with_progress(
        &self,
        batch: &RequestBatch,
        progress: Option<&mpsc::UnboundedSender<ProgressEvent>>,
    ) -> Result<Vec<ModelResult>, ValidationError> {
        batch.validate()?;
        let total = batch.models.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        log::info!("Querying {total} models");

        let mut pending: FuturesUnordered<_> = batch
            .models
            .iter()
            .enumerate()
            .map(|(index, model)| async move {
                let _permit = match &self.limiter {
                    Some(limiter) => limiter.acquire().await.ok(),
                    None => None,
                };
                let result = self
                    .executor
                    .call(
                        model,
                        &batch.prompt,
                        batch.temperature,
                        batch.system_prompt.as_deref(),
                        batch.stream,
                    )
                    .await;
                (index, result)
            })
            .collect();

        // Each call owns exactly one slot.
        let mut slots: Vec<Option<ModelResult>> = vec![None; total];
        let mut completed = 0;
        while let Some((index, result)) = pending.next().await {
            completed += 1;
            if let Some(tx) = progress {
                // A closed receiver only means nobody is watching.
                let _ = tx.send(ProgressEvent::new(index, completed, total, &result));
            }
            slots[index] = Some(result);
        }

        let results: Vec<ModelResult> = slots.into_iter().flatten().collect();
        let failed = results.iter().filter(|r| !r.is_success()).count();
        log::info!("Batch finished: {} ok, {failed} failed", total - failed);
        Ok(results)
    }
}

#[cfg(test)]
#[path = "comparator_tests.rs"]
mod tests;
