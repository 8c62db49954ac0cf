//! Data module - CSV loading and record validation

mod loader;
mod processor;
mod record;

pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessedData, ProcessorError, RowPolicy};
pub use record::{Record, REQUIRED_COLUMNS};
