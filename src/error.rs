//! Error types — validation failures on profile and analysis operations,
//! and storage failures from the persistence layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::preferences::Category;

/// Caller misuse detected before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown category `{value}`: expected ingredient, cuisine or cooking_method")]
    InvalidCategory { value: String },

    #[error("rating {value} for `{field}` is outside the -2..=2 scale")]
    RatingOutOfRange { field: String, value: i64 },

    #[error("macro target `{field}` must be a non-negative whole number, got {value}")]
    InvalidMacroValue { field: &'static str, value: i64 },

    #[error("invalid history input: {detail}")]
    InvalidInputShape { detail: String },

    #[error("{category} key is empty after normalization")]
    EmptyKey { category: Category },
}

/// Failure reading or writing the persisted profile.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("profile I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("profile at {path} is not valid YAML: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }
}
