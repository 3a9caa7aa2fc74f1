//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Hierarchy request error: cannot insert node {child} into {parent}")]
    HierarchyRequest { parent: u32, child: u32 },

    #[error("Unsupported selector: {0}")]
    UnsupportedSelector(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
