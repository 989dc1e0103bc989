//! Storage collaborator of the registration workflow.

use async_trait::async_trait;
use domain::{EmailAddress, NewUserAccount, UserAccount};
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The unique constraint on email rejected the write
    #[error("Email uniqueness constraint violated")]
    UniqueViolation,

    /// Any other storage failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Account store trait for dependency injection.
///
/// Implementations must reject a second account with the same normalized
/// email even when both saves race.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an account by normalized email
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserAccount>, StoreError>;

    /// Check whether an account with this normalized email exists
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StoreError>;

    /// Persist a new account, assigning its id and initial version
    async fn save(&self, account: NewUserAccount) -> Result<UserAccount, StoreError>;

    /// Check store connectivity
    async fn ping(&self) -> Result<(), StoreError>;
}
