//! Domain layer - Core registration entities and rules.
//!
//! This crate contains the account model, the registration rule table and the
//! password hashing collaborator. It has no database or transport
//! dependencies.

pub mod account;
pub mod constants;
pub mod email;
pub mod error;
pub mod password;
pub mod registration;

pub use account::{NewUserAccount, Role, RoleSet, UserAccount, UserAccountResponse};
pub use constants::*;
pub use email::EmailAddress;
pub use error::{DomainError, DomainResult};
pub use password::{Argon2PasswordHasher, PasswordHash, PasswordHasher};
pub use registration::{Field, RegistrationRequest, Rule, Violation, Violations};
