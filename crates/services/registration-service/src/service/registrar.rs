//! Registration workflow: validate, check uniqueness, hash, persist.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use domain::{
    DomainError, DomainResult, NewUserAccount, PasswordHash, PasswordHasher, RegistrationRequest,
    UserAccount,
};

use crate::repository::{StoreError, UserStore};

/// Registration use case trait for dependency injection.
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Register a new account from an untrusted request.
    ///
    /// On success exactly one account exists for the normalized email.
    /// On any error nothing has been persisted.
    async fn register(&self, request: RegistrationRequest) -> DomainResult<UserAccount>;
}

/// Registration workflow over a store and a password hasher.
pub struct UserRegistrar {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    timeout: Option<Duration>,
}

impl UserRegistrar {
    /// Create new registrar with its collaborators
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            timeout: None,
        }
    }

    /// Bound every registration by a deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn register_unbounded(&self, request: RegistrationRequest) -> DomainResult<UserAccount> {
        if let Err(violations) = request.validate() {
            debug!(%violations, "Registration rejected by validation");
            return Err(DomainError::Validation(violations));
        }

        let email = request.normalized_email();

        let exists = self
            .store
            .exists_by_email(&email)
            .await
            .map_err(store_failure)?;
        if exists {
            debug!("Registration rejected, email already registered");
            return Err(DomainError::DuplicateEmail);
        }

        let RegistrationRequest {
            password,
            first_name,
            last_name,
            ..
        } = request;
        let password_hash = self.hash_password(password).await?;

        let account = NewUserAccount::new(email, first_name, last_name, password_hash);

        match self.store.save(account).await {
            Ok(saved) => {
                info!(user_id = %saved.id, "User account registered");
                Ok(saved)
            }
            Err(StoreError::UniqueViolation) => {
                warn!("Email registered concurrently, rejecting duplicate");
                Err(DomainError::DuplicateEmail)
            }
            Err(err) => Err(store_failure(err)),
        }
    }

    /// Hash on the blocking pool; the plaintext is dropped when the task ends.
    async fn hash_password(&self, password: String) -> DomainResult<PasswordHash> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing worker failed: {}", e)))?
    }
}

fn store_failure(err: StoreError) -> DomainError {
    match err {
        StoreError::UniqueViolation => DomainError::DuplicateEmail,
        StoreError::Unavailable(msg) => {
            error!(error = %msg, "User store failure");
            DomainError::persistence(msg)
        }
    }
}

#[async_trait]
impl UserRegistration for UserRegistrar {
    async fn register(&self, request: RegistrationRequest) -> DomainResult<UserAccount> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.register_unbounded(request))
                .await
                .map_err(|_| {
                    warn!(timeout_ms = limit.as_millis() as u64, "Registration timed out");
                    DomainError::Timeout
                })?,
            None => self.register_unbounded(request).await,
        }
    }
}
