//! I/O-subsystem error type.

use thiserror::Error;

use forest_core::CoreError;

/// Errors produced by `forest-io`.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}:{line}: {what}")]
    Parse { path: String, line: usize, what: String },

    #[error("{path}:{line}: expected {expected} columns, found {found}")]
    ColumnMismatch { path: String, line: usize, expected: usize, found: usize },

    #[error("{path}: file holds no data rows")]
    Empty { path: String },

    #[error("{path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: CoreError,
    },
}

pub type IoResult<T> = Result<T, IoError>;
