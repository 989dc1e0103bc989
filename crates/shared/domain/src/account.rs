//! User account entity and related types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{INITIAL_VERSION, ROLE_ADMIN, ROLE_USER};
use crate::email::EmailAddress;
use crate::password::PasswordHash;

/// Account roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Role granted to every newly registered account
    pub const DEFAULT: Role = Role::User;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a stored role value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ROLE_USER => Some(Role::User),
            ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique, unordered set of roles.
pub type RoleSet = BTreeSet<Role>;

/// Persisted user account.
///
/// `id` and `version` are assigned by the store. The version is an optimistic
/// concurrency token owned by the storage layer; the registration workflow
/// never reads it.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub version: i32,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
    pub roles: RoleSet,
    pub validated: bool,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Check if the account holds a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check if the account can be used (not disabled)
    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

/// Account built by the registration workflow before the store assigns an
/// identity.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
    pub roles: RoleSet,
    pub validated: bool,
    pub disabled: bool,
}

impl NewUserAccount {
    /// Create a new account with the default role, not validated, enabled.
    pub fn new(
        email: EmailAddress,
        first_name: String,
        last_name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            email,
            first_name,
            last_name,
            password_hash,
            roles: RoleSet::from([Role::DEFAULT]),
            validated: false,
            disabled: false,
        }
    }

    /// Attach the identity assigned by a store.
    pub fn into_account(self, id: Uuid, created_at: DateTime<Utc>) -> UserAccount {
        UserAccount {
            id,
            version: INITIAL_VERSION,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            roles: self.roles,
            validated: self.validated,
            disabled: self.disabled,
            created_at,
        }
    }
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Normalized email address
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Granted roles
    pub roles: Vec<String>,
    pub validated: bool,
    pub disabled: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserAccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email.into_string(),
            first_name: account.first_name,
            last_name: account.last_name,
            roles: account.roles.iter().map(Role::to_string).collect(),
            validated: account.validated,
            disabled: account.disabled,
            created_at: account.created_at,
        }
    }
}

impl From<&UserAccount> for UserAccountResponse {
    fn from(account: &UserAccount) -> Self {
        Self::from(account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewUserAccount {
        NewUserAccount::new(
            EmailAddress::normalize("jane@example.com"),
            "Jane".to_string(),
            "Doe".to_string(),
            PasswordHash::from_hash("$argon2id$stub".to_string()),
        )
    }

    #[test]
    fn test_new_account_defaults() {
        let account = new_account();
        assert_eq!(account.roles, RoleSet::from([Role::User]));
        assert!(!account.validated);
        assert!(!account.disabled);
    }

    #[test]
    fn test_into_account_assigns_identity() {
        let id = Uuid::new_v4();
        let account = new_account().into_account(id, Utc::now());

        assert_eq!(account.id, id);
        assert_eq!(account.version, INITIAL_VERSION);
        assert!(account.has_role(Role::User));
        assert!(!account.has_role(Role::Admin));
        assert!(account.is_active());
    }

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!(Role::User.to_string(), "USER");
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_response_hides_hash() {
        let account = new_account().into_account(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_string(&UserAccountResponse::from(&account)).unwrap();

        assert!(!json.contains("argon2"));
        assert!(json.contains("\"firstName\":\"Jane\""));
        assert!(json.contains("\"roles\":[\"USER\"]"));
    }
}
