//! Load the frame dataset from disk (JSON or YAML) or from memory.
//! The query handler re-reads through a [DatasetSource] on every request.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::data::dataset::FrameDataset;
use crate::error::DataError;

pub const DEFAULT_DATASET_PATH: &str = "data/frames.json";

/// Where the dataset bytes come from. Implementations must return a fresh copy per call.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<FrameDataset, DataError>;

    /// Human-readable origin for logs and health output.
    fn describe(&self) -> String;
}

/// Reads a dataset file; format chosen by extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn load(&self) -> Result<FrameDataset, DataError> {
        load_dataset(&self.path)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// Serves clones of an already-parsed dataset. Used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    dataset: FrameDataset,
}

impl MemorySource {
    pub fn new(dataset: FrameDataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for MemorySource {
    fn load(&self) -> Result<FrameDataset, DataError> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} characters)", self.dataset.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Json,
    Yaml,
}

fn format_for(path: &Path) -> Option<DatasetFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(DatasetFormat::Json),
        "yaml" | "yml" => Some(DatasetFormat::Yaml),
        _ => None,
    }
}

fn parse_as<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T, DataError> {
    match format_for(path) {
        Some(DatasetFormat::Json) => serde_json::from_str(raw).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some(DatasetFormat::Yaml) => serde_yaml::from_str(raw).map_err(|source| DataError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        None => Err(DataError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_file(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a dataset from an in-memory string in the given file's format.
pub fn parse_dataset(path: &Path, raw: &str) -> Result<FrameDataset, DataError> {
    parse_as(path, raw)
}

/// Read a dataset file as an untyped document, for shape checks that must not stop
/// at the first record that fails to deserialize.
pub fn load_raw_dataset(path: impl AsRef<Path>) -> Result<Value, DataError> {
    let path = path.as_ref();
    parse_as(path, &read_file(path)?)
}

/// Load and parse a dataset file. An empty dataset is an error: nothing can be matched.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<FrameDataset, DataError> {
    let path = path.as_ref();
    let dataset = parse_dataset(path, &read_file(path)?)?;
    if dataset.is_empty() {
        return Err(DataError::Empty);
    }
    log::debug!("loaded {} characters from {}", dataset.len(), path.display());
    Ok(dataset)
}
