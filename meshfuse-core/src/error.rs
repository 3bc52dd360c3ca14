//! Error types for meshfuse

use thiserror::Error;

/// Main error type for meshfuse operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown edge: ({a}, {b}) is not in the edge index")]
    UnknownEdge { a: usize, b: usize },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for meshfuse operations
pub type Result<T> = std::result::Result<T, Error>;
