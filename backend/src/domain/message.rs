//! Chat messages and the channels they are posted to.
//!
//! Messages are immutable once appended. Their `created_at` is assigned by
//! the store and is the only ordering key.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DisplayName, RoomId, UserId};

/// Hard cap on how many messages a history read returns.
pub const MESSAGE_HISTORY_LIMIT: usize = 50;

/// Maximum message length in characters.
pub const MESSAGE_CONTENT_MAX: usize = 2000;

/// Validation errors for message content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    /// Content was empty after trimming.
    #[error("Message content is required")]
    EmptyContent,
    /// Content exceeded [`MESSAGE_CONTENT_MAX`] characters.
    #[error("message content must be at most {max} characters")]
    ContentTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Stable message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Allocate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated message body, stored trimmed.
///
/// # Examples
/// ```
/// use roomchat::domain::MessageContent;
///
/// assert_eq!(MessageContent::new(" hi ").expect("valid").as_ref(), "hi");
/// assert!(MessageContent::new("\n").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Trim and validate message content.
    pub fn new(content: impl AsRef<str>) -> Result<Self, MessageValidationError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MessageValidationError::EmptyContent);
        }
        if trimmed.chars().count() > MESSAGE_CONTENT_MAX {
            return Err(MessageValidationError::ContentTooLong {
                max: MESSAGE_CONTENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Where a message lives: a specific room or the room-less global channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The global channel; any authenticated user may read and post.
    Global,
    /// A room; access is governed by membership.
    Room(RoomId),
}

impl Channel {
    /// Room identifier, or `None` for the global channel.
    pub const fn room_id(self) -> Option<RoomId> {
        match self {
            Self::Global => None,
            Self::Room(id) => Some(id),
        }
    }
}

impl From<Option<RoomId>> for Channel {
    fn from(value: Option<RoomId>) -> Self {
        value.map_or(Self::Global, Self::Room)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Room(id) => write!(f, "room:{id}"),
        }
    }
}

/// Message to append; the store assigns the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Pre-allocated identifier.
    pub id: MessageId,
    /// Target channel.
    pub channel: Channel,
    /// Author.
    pub sender_id: UserId,
    /// Validated body.
    pub content: MessageContent,
}

/// Stored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier.
    pub id: MessageId,
    /// Channel the message was posted to.
    pub channel: Channel,
    /// Author.
    pub sender_id: UserId,
    /// Body.
    pub content: MessageContent,
    /// Store-assigned timestamp.
    pub created_at: DateTime<Utc>,
}

/// Sender attributes resolved when history is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    /// Display name, absent if the sender's profile no longer exists.
    pub display_name: Option<DisplayName>,
    /// Avatar reference.
    pub avatar_ref: Option<String>,
    /// Verification badge.
    pub is_verified_owner: bool,
}

/// Message joined with its sender's current profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    /// The stored message.
    pub message: Message,
    /// Sender attributes at read time.
    pub sender: SenderProfile,
}
