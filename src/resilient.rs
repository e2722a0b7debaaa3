#[path = "resilient/config.rs"]
mod config;

#[path = "resilient/wrapper.rs"]
mod wrapper;

pub use config::{ResilienceConfig, RetryOn};
pub use wrapper::ResilientProvider;
