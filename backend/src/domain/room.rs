//! Room aggregate and its listing projection.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DisplayName, UserId};

/// Maximum room name length in characters.
pub const ROOM_NAME_MAX: usize = 64;

/// Validation errors raised while constructing room values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomValidationError {
    /// The name was empty after trimming.
    #[error("Room name is required")]
    EmptyName,
    /// The name exceeded [`ROOM_NAME_MAX`] characters.
    #[error("room name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The identifier was not a UUID.
    #[error("room id must be a valid UUID")]
    InvalidId,
}

/// Stable room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Allocate a fresh identifier for a new room.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = RoomValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| RoomValidationError::InvalidId)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name, stored trimmed.
///
/// # Examples
/// ```
/// use roomchat::domain::RoomName;
///
/// let name = RoomName::new("  general ").expect("valid name");
/// assert_eq!(name.as_ref(), "general");
/// assert!(RoomName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    /// Trim and validate a room name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RoomValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RoomValidationError::EmptyName);
        }
        if trimmed.chars().count() > ROOM_NAME_MAX {
            return Err(RoomValidationError::NameTooLong {
                max: ROOM_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named chat room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Trimmed, non-empty name.
    pub name: RoomName,
    /// Administrator who created the room.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Room row as presented in the room list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// The room itself.
    pub room: Room,
    /// Display name of the creator, if their profile still exists.
    pub creator_name: Option<DisplayName>,
    /// Avatar of the creator.
    pub creator_avatar: Option<String>,
    /// Number of current memberships.
    pub member_count: u64,
}
