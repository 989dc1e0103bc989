//! Account persistence.

pub mod entities;
pub mod memory_store;
pub mod postgres_store;
pub mod user_store;

pub use memory_store::InMemoryUserStore;
pub use postgres_store::PostgresUserStore;
pub use user_store::{StoreError, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_store::MockUserStore;
