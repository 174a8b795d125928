//! User identity as seen by the chat core.
//!
//! Users are owned by the authentication service. This crate only reads
//! their identifiers and display attributes, and derives a per-request
//! [`Actor`] snapshot for authorization decisions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for user identifiers and display attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The display name was empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// The display name exceeded the maximum length.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable display name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = display_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Read-only projection of a user record owned by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable user identifier.
    pub id: UserId,
    /// Name shown next to messages and in member lists.
    pub display_name: DisplayName,
    /// Contact address, surfaced to room operators only.
    pub email: Option<String>,
    /// Reference to the user's avatar image.
    pub avatar_ref: Option<String>,
    /// Process-wide superuser flag.
    pub is_admin: bool,
    /// Cosmetic verification badge.
    pub is_verified_owner: bool,
}

impl UserProfile {
    /// Build a profile with no optional attributes and no flags set.
    pub fn new(id: UserId, display_name: DisplayName) -> Self {
        Self {
            id,
            display_name,
            email: None,
            avatar_ref: None,
            is_admin: false,
            is_verified_owner: false,
        }
    }

    /// Mark the profile as a process-wide administrator.
    #[must_use]
    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Snapshot the fields authorization decisions depend on.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Immutable per-request view of the authenticated caller.
///
/// The `is_admin` flag is copied once when the request starts; the
/// authorization engine never looks it up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Authenticated user identifier.
    pub id: UserId,
    /// Process-wide superuser flag at request time.
    pub is_admin: bool,
}
