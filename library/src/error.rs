use thiserror::Error;

use crate::model::id::NodeId;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Document error: {0}")]
    Document(String),
}

impl LibraryError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        LibraryError::InvalidOperation(message.into())
    }

    pub fn document(message: impl Into<String>) -> Self {
        LibraryError::Document(message.into())
    }
}
