use crate::graph::NodeId;
use thiserror::Error;

pub type Result<T, E = SteinerError> = std::result::Result<T, E>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SteinerError {
    #[error("invalid edge {from}-{to}: {reason}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        reason: &'static str,
    },
    #[error("cannot generate instance: {0}")]
    InvalidInstance(String),
    #[error("node {to} is unreachable from node {from}")]
    Unreachable { from: NodeId, to: NodeId },
    #[error("graph is not connected")]
    Disconnected,
    #[error("not a tree: {nodes} nodes but {edges} edges")]
    NotATree { nodes: usize, edges: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Error while reading a PACE instance. `line` is 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message} (line {line})")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
