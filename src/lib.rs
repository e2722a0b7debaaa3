//! Compare the answers of several LLMs to the same prompt.
//!
//! Every model is reached through one OpenAI-compatible gateway. A batch is
//! validated, fanned out concurrently, and collected back in input order with
//! latency, token usage and an estimated cost for each model.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use llm_compare::backends::gateway::Gateway;
//! use llm_compare::compare::{ModelComparator, RequestBatch};
//! use llm_compare::executor::ModelExecutor;
//! use llm_compare::resilient::ResilienceConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new("sk-...", "http://localhost:4000/")?;
//! let executor = ModelExecutor::new(Arc::new(gateway), ResilienceConfig::defaults());
//! let comparator = ModelComparator::new(executor);
//! let batch = RequestBatch::new("Explain ownership in one sentence")
//!     .models(["gpt-4o-mini", "claude-3-5-sonnet-20241022"]);
//! for result in comparator.compare_models(&batch).await? {
//!     println!("{}: {:?}", result.model(), result.response());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod backends;
pub mod chat;
pub mod compare;
pub mod error;
pub mod executor;
pub mod export;
pub mod pricing;
pub mod resilient;
pub mod result;
pub mod validate;

#[cfg(test)]
mod testing;

pub use compare::{ModelComparator, ProgressEvent, RequestBatch};
pub use error::{GatewayError, ValidationError};
pub use result::ModelResult;
