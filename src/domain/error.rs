//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree invariants.
/// These are independent of serialization and I/O concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("root node cannot be deleted: {0}")]
    RootDeletion(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node at {path} has an empty id")]
    EmptyId { path: String },

    #[error("tree deeper than {max} levels at: {at}")]
    TooDeep { at: String, max: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
