mod error;
mod format;
mod load;
mod paths;
mod save;
mod types;

pub use error::ConfigError;
pub use load::load_config;
pub use paths::default_logs_dir;
pub use save::create_example_config;
pub use types::{CompareConfig, LoggingConfig};
