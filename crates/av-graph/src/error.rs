//! Road-graph error type.

use thiserror::Error;

use av_core::NodeId;

/// Errors produced by `av-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;
