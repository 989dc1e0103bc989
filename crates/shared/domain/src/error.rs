//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

use crate::registration::Violations;

/// Domain-specific errors raised by the registration workflow.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// One or more request fields broke a validation rule
    #[error("Validation error: {0}")]
    Validation(Violations),

    /// An account with this email already exists
    #[error("Email already registered")]
    DuplicateEmail,

    /// The store failed for a reason other than a duplicate email
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    /// The registration deadline elapsed before the workflow finished
    #[error("Registration timed out")]
    Timeout,

    /// Password hashing failed or is misconfigured
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a persistence conflict error
    pub fn persistence(msg: impl Into<String>) -> Self {
        DomainError::PersistenceConflict(msg.into())
    }

    /// Create a hashing error
    pub fn hashing(msg: impl Into<String>) -> Self {
        DomainError::Hashing(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }

    /// True when the caller may retry the whole registration call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::PersistenceConflict(_) | DomainError::Timeout)
    }
}

impl From<Violations> for DomainError {
    fn from(violations: Violations) -> Self {
        DomainError::Validation(violations)
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
