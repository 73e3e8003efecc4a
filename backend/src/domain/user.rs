//! User identity, roles, and registration input.
//!
//! Password hashes never appear on [`User`]; they travel only inside
//! [`UserCredentialsRecord`] between the persistence and security adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

const USERNAME_MAX: usize = 80;

/// Validation errors raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a positive integer")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("invalid role")]
    InvalidRole,
}

/// Database-assigned user identifier.
///
/// # Examples
/// ```
/// use inventory::domain::UserId;
///
/// let id = UserId::new(7).expect("positive id");
/// assert_eq!(id.get(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(UserValidationError::InvalidId)
        }
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i32>()
            .map_err(|_| UserValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed access roles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
}

impl Role {
    /// Lowercase wire and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trimmed, non-empty login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application user as seen by the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub role: Role,
}

/// Stored user row including the password hash, used only for login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialsRecord {
    pub user: User,
    pub password_hash: String,
}

/// Validated registration input.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` is non-empty; whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate raw registration fields. A missing or blank role means
    /// [`Role::Staff`].
    pub fn try_from_parts(
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        let role = match role.map(str::trim) {
            None | Some("") => Role::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case(" Manager ", Role::Manager)]
    #[case("STAFF", Role::Staff)]
    fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    #[case("owner")]
    #[case("")]
    fn role_rejects_unknown_values(#[case] raw: &str) {
        assert_eq!(raw.parse::<Role>(), Err(UserValidationError::InvalidRole));
    }

    #[rstest]
    fn role_serialises_lowercase() {
        let value = serde_json::to_value(Role::Manager).expect("serialise role");
        assert_eq!(value, serde_json::json!("manager"));
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn user_id_rejects_non_positive(#[case] raw: i32) {
        assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
    }

    #[rstest]
    fn username_is_trimmed_and_bounded() {
        let name = Username::new("  alice ").expect("valid username");
        assert_eq!(name.as_str(), "alice");
        let too_long = "x".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(&too_long),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    #[case(None, Role::Staff)]
    #[case(Some(""), Role::Staff)]
    #[case(Some("admin"), Role::Admin)]
    fn registration_defaults_role(#[case] role: Option<&str>, #[case] expected: Role) {
        let registration =
            Registration::try_from_parts("bob", "secret", role).expect("valid registration");
        assert_eq!(registration.role(), expected);
        assert_eq!(registration.username().as_str(), "bob");
    }

    #[rstest]
    #[case("", "pw", None, UserValidationError::EmptyUsername)]
    #[case("bob", "", None, UserValidationError::EmptyPassword)]
    #[case("bob", "pw", Some("root"), UserValidationError::InvalidRole)]
    fn registration_rejects_invalid_input(
        #[case] username: &str,
        #[case] password: &str,
        #[case] role: Option<&str>,
        #[case] expected: UserValidationError,
    ) {
        let err = Registration::try_from_parts(username, password, role)
            .expect_err("invalid registration must fail");
        assert_eq!(err, expected);
    }
}
