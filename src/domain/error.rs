//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the component contracts.
/// The flyweight and proxy paths are total, so every variant here
/// belongs to the equipment tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported operation '{op}' on leaf equipment #{id}: leaf nodes cannot have children")]
    UnsupportedOperation { id: i32, op: &'static str },

    #[error("equipment #{child} is not a child of #{parent}")]
    NotFound { parent: i32, child: i32 },

    #[error("equipment node no longer exists (destroyed or foreign handle)")]
    NodeNotFound,

    #[error("equipment id already in use: {0}")]
    DuplicateId(i32),

    #[error("equipment #{child} is already owned by #{parent}")]
    AlreadyAttached { child: i32, parent: i32 },

    #[error("cycle detected: #{child} is #{parent} or one of its ancestors")]
    CycleDetected { parent: i32, child: i32 },

    #[error("net price of equipment #{id} does not fit in i64")]
    PriceOverflow { id: i32 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
