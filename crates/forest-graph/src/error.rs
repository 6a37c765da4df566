//! Graph-subsystem error type.

use forest_core::NodeId;
use thiserror::Error;

/// Errors produced by `forest-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}:{line}: {what}")]
    Parse { path: String, line: usize, what: String },

    #[error("{path}: expected {expected} {kind} lines, found {found}")]
    CountMismatch { path: String, kind: &'static str, expected: usize, found: usize },

    #[error("arc {src_node} -> {dst_node} references a node outside [0, {num_nodes})")]
    ArcOutOfRange { src_node: NodeId, dst_node: NodeId, num_nodes: usize },

    #[error("arc {src_node} -> {dst_node} has no reverse counterpart; graph is not bidirectional")]
    NotBidirectional { src_node: NodeId, dst_node: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
