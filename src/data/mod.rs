//! Frame dataset model, loading and validation.

pub mod dataset;
pub mod loader;
pub mod validate;

pub use dataset::{display_value, Character, FrameDataset, MoveRecord, MoveTables, TriggerMode};
pub use loader::{load_dataset, DatasetSource, FileSource, MemorySource, DEFAULT_DATASET_PATH};
