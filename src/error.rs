//! Error types shared by the dataset loader and the frame query pipeline.
//!
//! User mistakes (bad grammar, unknown character/move) are not errors here:
//! they become chat replies. These types only cover data and I/O problems.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported dataset extension for '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("dataset contains no characters")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Data(#[from] DataError),

    /// `extraInfo` was stored as a string that is not a JSON array of strings.
    #[error("extraInfo for {character} - {move_key} is not valid json: {source}")]
    ExtraInfo {
        character: String,
        move_key: String,
        #[source]
        source: serde_json::Error,
    },
}
