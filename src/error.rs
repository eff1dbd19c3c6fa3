//! 统一错误类型。
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow`.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HivevoError {
    /// The annotation of `reference` has no feature named `region`.
    #[error("region '{region}' not found in the annotation of reference '{reference}'")]
    RegionNotFound { region: String, reference: String },

    /// Coordinate selectors must be rank 1 or rank 2 (with at least one column).
    #[error("unsupported coordinate array shape {shape:?}: expected a vector or a matrix with the reference position in column 0")]
    UnsupportedShape { shape: Vec<usize> },

    #[error("unknown reference '{name}' (translator knows '{ref1}' and '{ref2}')")]
    UnknownReference { name: String, ref1: String, ref2: String },

    #[error("cannot load '{}': {message}", path.display())]
    DataLoad { path: PathBuf, message: String },

    #[error("position {position} is outside the reference profile (length {len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("invalid data: {message}")]
    InvalidData { message: String },
}

pub type Result<T> = std::result::Result<T, HivevoError>;

impl HivevoError {
    pub fn data_load(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::DataLoad {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData { message: message.into() }
    }
}
