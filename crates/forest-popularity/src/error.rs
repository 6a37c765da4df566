//! Popularity-subsystem error type.

use thiserror::Error;

/// Errors produced by `forest-popularity`.
#[derive(Debug, Error)]
pub enum PopularityError {
    #[error("mode shares {walking} + {cycling} + {car} do not sum to 1")]
    InvalidModeShares { walking: f32, cycling: f32, car: f32 },

    #[error("{points} population points but {values} population values")]
    PopulationMismatch { points: usize, values: usize },
}

pub type PopularityResult<T> = Result<T, PopularityError>;
