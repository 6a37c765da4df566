//! Model-subsystem error type.

use thiserror::Error;

use forest_graph::GraphError;

/// Errors produced by `forest-model`.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("{entries} forest entries but {populations} population values")]
    EntryPopulationMismatch { entries: usize, populations: usize },

    #[error("unknown approach selector {0} (0 = Flooding, 1 = Via-Edge)")]
    UnknownApproach(i32),
}

pub type ModelResult<T> = Result<T, ModelError>;
