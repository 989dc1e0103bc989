//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new accounts
pub const ROLE_USER: &str = "USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Symbols accepted by the password composition rule
pub const PASSWORD_SYMBOLS: &str = "#?!@$%^&*-";

/// Minimum first/last name length
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum first/last name length
pub const MAX_NAME_LENGTH: usize = 256;

/// Characters allowed in first/last names: letters, space, comma, period,
/// apostrophe, hyphen
pub const NAME_PATTERN: &str = r"^[\p{L} ,.'-]+$";

// =============================================================================
// Optimistic concurrency
// =============================================================================

/// Version assigned to a freshly persisted account
pub const INITIAL_VERSION: i32 = 0;
