//! Room membership: the authorization source of truth for a room.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{RoomId, UserId, UserProfile};

/// Role a member holds within one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full control; seeded for the room creator.
    Administrator,
    /// May administer members but is never created implicitly.
    Moderator,
    /// Ordinary participant.
    User,
}

impl Role {
    /// Stable lowercase identifier used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Moderator => "moderator",
            Self::User => "user",
        }
    }

    /// Whether the role may kick, mute, or re-role other members.
    pub const fn is_operator(self) -> bool {
        matches!(self, Self::Administrator | Self::Moderator)
    }
}

/// Error raised when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role: {value}")]
pub struct RoleParseError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Self::Administrator),
            "moderator" => Ok(Self::Moderator),
            "user" => Ok(Self::User),
            other => Err(RoleParseError {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's standing in a room. At most one exists per (room, user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Room the membership belongs to.
    pub room_id: RoomId,
    /// Member's user id.
    pub user_id: UserId,
    /// Current role.
    pub role: Role,
    /// Whether posting is suspended.
    pub is_muted: bool,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// Membership joined with the member's display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    /// The membership row.
    pub membership: Membership,
    /// Profile of the member at read time.
    pub profile: UserProfile,
}

/// Administrative action applied to a target member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    /// Remove the membership. Repeating it is not an error.
    Kick,
    /// Suspend posting rights.
    Mute,
    /// Restore posting rights.
    Unmute,
    /// Change the member's role.
    SetRole(Role),
}

impl MemberAction {
    /// Confirmation text returned after the action succeeds.
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::Kick => "User kicked from room",
            Self::Mute => "User muted",
            Self::Unmute => "User unmuted",
            Self::SetRole(_) => "User role updated",
        }
    }

    /// Short label used in logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::SetRole(_) => "set_role",
        }
    }
}
