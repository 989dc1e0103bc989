//! In-memory account store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::user_store::{StoreError, UserStore};
use domain::{EmailAddress, NewUserAccount, UserAccount};

/// Account store keyed by normalized email. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    accounts: RwLock<HashMap<EmailAddress, UserAccount>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StoreError> {
        Ok(self.accounts.read().await.contains_key(email))
    }

    async fn save(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        // Check and insert under one write lock
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(StoreError::UniqueViolation);
        }

        let saved = account.into_account(Uuid::new_v4(), Utc::now());
        accounts.insert(saved.email.clone(), saved.clone());
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{PasswordHash, INITIAL_VERSION};

    fn new_account(email: &str) -> NewUserAccount {
        NewUserAccount::new(
            EmailAddress::normalize(email),
            "Jane".to_string(),
            "Doe".to_string(),
            PasswordHash::from_hash("$argon2id$stub".to_string()),
        )
    }

    #[tokio::test]
    async fn test_save_assigns_identity() {
        let store = InMemoryUserStore::new();
        let saved = store.save(new_account("a@b.com")).await.unwrap();

        assert_eq!(saved.version, INITIAL_VERSION);
        assert!(store.exists_by_email(&saved.email).await.unwrap());

        let found = store.find_by_email(&saved.email).await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let store = InMemoryUserStore::new();
        store.save(new_account("a@b.com")).await.unwrap();

        let result = store.save(new_account("a@b.com")).await;
        assert_eq!(result.unwrap_err(), StoreError::UniqueViolation);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_email() {
        let store = InMemoryUserStore::new();
        let email = EmailAddress::normalize("nobody@b.com");

        assert!(!store.exists_by_email(&email).await.unwrap());
        assert!(store.find_by_email(&email).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
