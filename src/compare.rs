#[path = "compare/batch.rs"]
mod batch;

#[path = "compare/comparator.rs"]
mod comparator;

pub use batch::{RequestBatch, DEFAULT_TEMPERATURE};
pub use comparator::{ModelComparator, ProgressEvent};
