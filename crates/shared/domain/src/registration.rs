//! Registration request and its validation rules.
//!
//! Rules live in a table of `(field, rule, predicate)` entries evaluated in
//! order. The HTTP boundary runs the same predicates through `validator`
//! derives, so both layers report identical rule codes.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::constants::{
    MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, NAME_PATTERN,
    PASSWORD_SYMBOLS,
};
use crate::email::EmailAddress;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// Registration input. Not persisted.
#[derive(Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

// Never print the password
impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl RegistrationRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Run every rule and collect all violations.
    pub fn validate(&self) -> Result<(), Violations> {
        let violations: Vec<Violation> = RULES
            .iter()
            .filter(|rule| !(rule.check)(self.value(rule.field)))
            .map(|rule| Violation {
                field: rule.field,
                rule: rule.rule,
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(violations))
        }
    }

    /// Canonical form of the email used for uniqueness and storage.
    pub fn normalized_email(&self) -> EmailAddress {
        EmailAddress::normalize(&self.email)
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
        }
    }
}

/// Request field names as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    FirstName,
    LastName,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
        }
    }

    /// Resolve a wire name or a Rust field name (`first_name`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(Field::Email),
            "password" => Some(Field::Password),
            "firstName" | "first_name" => Some(Field::FirstName),
            "lastName" | "last_name" => Some(Field::LastName),
            _ => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rules a field can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    EmailSyntax,
    PasswordLength,
    PasswordComposition,
    NameLength,
    NameCharacters,
}

impl Rule {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Rule::EmailSyntax => "email_syntax",
            Rule::PasswordLength => "password_length",
            Rule::PasswordComposition => "password_composition",
            Rule::NameLength => "name_length",
            Rule::NameCharacters => "name_characters",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Rule::EmailSyntax => "Email must be valid",
            Rule::PasswordLength => "Password must be between 8 and 256 characters",
            Rule::PasswordComposition => {
                "Password must contain an uppercase letter, a lowercase letter, a number and one of #?!@$%^&*-, and no line breaks"
            }
            Rule::NameLength => "Name must be between 2 and 256 characters",
            Rule::NameCharacters => {
                "Name may only contain letters, spaces, commas, periods, apostrophes and hyphens"
            }
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single broken rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub rule: Rule,
}

/// Non-empty list of broken rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a specific field broke a specific rule
    pub fn contains(&self, field: Field, rule: Rule) -> bool {
        self.0.iter().any(|v| v.field == field && v.rule == rule)
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{} ({})", v.field, v.rule))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct FieldRule {
    field: Field,
    rule: Rule,
    check: fn(&str) -> bool,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Email,
        rule: Rule::EmailSyntax,
        check: is_valid_email,
    },
    FieldRule {
        field: Field::Password,
        rule: Rule::PasswordLength,
        check: has_valid_password_length,
    },
    FieldRule {
        field: Field::Password,
        rule: Rule::PasswordComposition,
        check: meets_password_composition,
    },
    FieldRule {
        field: Field::FirstName,
        rule: Rule::NameLength,
        check: has_valid_name_length,
    },
    FieldRule {
        field: Field::FirstName,
        rule: Rule::NameCharacters,
        check: has_valid_name_characters,
    },
    FieldRule {
        field: Field::LastName,
        rule: Rule::NameLength,
        check: has_valid_name_length,
    },
    FieldRule {
        field: Field::LastName,
        rule: Rule::NameCharacters,
        check: has_valid_name_characters,
    },
];

// =============================================================================
// Predicates
// =============================================================================

/// Standard email syntax (surrounding whitespace ignored).
pub fn is_valid_email(value: &str) -> bool {
    value.trim().validate_email()
}

pub fn has_valid_password_length(value: &str) -> bool {
    (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&value.chars().count())
}

/// At least one ASCII uppercase, lowercase, digit and accepted symbol, and
/// no line terminator anywhere.
pub fn meets_password_composition(value: &str) -> bool {
    !value.chars().any(is_line_terminator)
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

pub fn has_valid_name_length(value: &str) -> bool {
    (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&value.chars().count())
}

pub fn has_valid_name_characters(value: &str) -> bool {
    NAME_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegistrationRequest {
        RegistrationRequest::new("a@b.com", "Abcdef1!", "Jane", "Doe")
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::Email, Rule::EmailSyntax));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_password_without_uppercase() {
        let mut request = valid_request();
        request.password = "alllowercase1!".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::Password, Rule::PasswordComposition));
        assert!(!violations.contains(Field::Password, Rule::PasswordLength));
    }

    #[test]
    fn test_password_symbol_must_come_from_fixed_set() {
        // '+' is not an accepted symbol
        assert!(!meets_password_composition("Abcdef1+"));
        assert!(meets_password_composition("Abcdef1#"));
        assert!(meets_password_composition("Abcdef1-"));
    }

    #[test]
    fn test_password_with_line_break_rejected() {
        let mut request = valid_request();
        request.password = "Abc\ndef1!".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::Password, Rule::PasswordComposition));
        assert!(!meets_password_composition("Abcdef1!\r"));
        assert!(!meets_password_composition("Abc\u{2028}def1!"));
        // Other whitespace is still allowed
        assert!(meets_password_composition("Abc def1!"));
    }

    #[test]
    fn test_field_from_name() {
        assert_eq!(Field::from_name("first_name"), Some(Field::FirstName));
        assert_eq!(Field::from_name("lastName"), Some(Field::LastName));
        assert_eq!(Field::from_name("age"), None);
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(!has_valid_password_length("Abcde1!"));
        assert!(has_valid_password_length("Abcdef1!"));
        assert!(has_valid_password_length(&"a".repeat(256)));
        assert!(!has_valid_password_length(&"a".repeat(257)));
    }

    #[test]
    fn test_short_password_breaks_both_rules_when_applicable() {
        let mut request = valid_request();
        request.password = "abc".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::Password, Rule::PasswordLength));
        assert!(violations.contains(Field::Password, Rule::PasswordComposition));
    }

    #[test]
    fn test_name_with_digit_rejected() {
        let mut request = valid_request();
        request.first_name = "John3".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::FirstName, Rule::NameCharacters));
    }

    #[test]
    fn test_name_allows_unicode_and_punctuation() {
        assert!(has_valid_name_characters("Zoë"));
        assert!(has_valid_name_characters("O'Brien-Smith, Jr."));
        assert!(has_valid_name_characters("José María"));
        assert!(!has_valid_name_characters("Jane_Doe"));
    }

    #[test]
    fn test_name_length_bounds() {
        let mut request = valid_request();
        request.last_name = "D".to_string();

        let violations = request.validate().unwrap_err();
        assert!(violations.contains(Field::LastName, Rule::NameLength));
        assert!(!has_valid_name_length(&"a".repeat(257)));
    }

    #[test]
    fn test_all_violations_collected() {
        let request = RegistrationRequest::new("bad", "short", "J", "D0e");
        let violations = request.validate().unwrap_err();

        assert!(violations.contains(Field::Email, Rule::EmailSyntax));
        assert!(violations.contains(Field::Password, Rule::PasswordLength));
        assert!(violations.contains(Field::FirstName, Rule::NameLength));
        assert!(violations.contains(Field::LastName, Rule::NameCharacters));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", valid_request());
        assert!(!rendered.contains("Abcdef1!"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_violations_display_names_field_and_rule() {
        let mut request = valid_request();
        request.first_name = "John3".to_string();

        let message = request.validate().unwrap_err().to_string();
        assert_eq!(message, "firstName (name_characters)");
    }
}
