//! Shared error type for the core primitives.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they construct core types from file input.

use thiserror::Error;

/// Validation failures of core value types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("preference table is empty")]
    EmptyPreferences,

    #[error("preference table has {bounds} upper bounds but {shares} shares")]
    ColumnMismatch { bounds: usize, shares: usize },

    #[error("preference upper bound {0} is not greater than its predecessor {1}")]
    BoundsNotIncreasing(f32, f32),

    #[error("preference share {0} is not in [0, 1]")]
    ShareOutOfRange(f32),

    #[error("preference shares sum to {0}, which exceeds 1")]
    ShareSumExceedsOne(f32),
}

/// Shorthand result type for core validation.
pub type CoreResult<T> = Result<T, CoreError>;
