use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while training, running or storing the mood classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Training was requested before any sample was collected.
    #[error("No samples collected")]
    EmptySampleSet,
    /// An embedding does not have the width the classifier expects.
    #[error("Embedding width {actual} does not match classifier input width {expected}")]
    InputWidthMismatch { expected: usize, actual: usize },
    /// A probability vector does not have one entry per label.
    #[error("Prediction width {actual} does not match label count {expected}")]
    ProbabilityWidthMismatch { expected: usize, actual: usize },
    /// Weights or metadata are inconsistent.
    #[error("Invalid classifier model: {0}")]
    InvalidModel(String),
    #[error("Unable to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid classifier file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize classifier: {source}")]
    Serialize { source: serde_json::Error },
}
