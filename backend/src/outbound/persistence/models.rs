//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain values re-run
//! domain validation, so a row that no longer satisfies an invariant surfaces
//! as a [`RowDecodeError`] instead of leaking into the services.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{messages, room_members, rooms, users};
use crate::domain::{
    Channel, DisplayName, Membership, Message, MessageContent, MessageId, Role, Room, RoomId,
    RoomName, UserId, UserProfile,
};

/// A stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row: {message}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    message: String,
}

impl RowDecodeError {
    fn new(table: &'static str, error: impl std::fmt::Display) -> Self {
        Self {
            table,
            message: error.to_string(),
        }
    }
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_ref: Option<String>,
    pub is_admin: bool,
    pub is_verified_owner: bool,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = RowDecodeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let display_name =
            DisplayName::new(row.display_name).map_err(|err| RowDecodeError::new("users", err))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            display_name,
            email: row.email,
            avatar_ref: row.avatar_ref,
            is_admin: row.is_admin,
            is_verified_owner: row.is_verified_owner,
        })
    }
}

/// Row struct for reading from the rooms table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomRow {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable room; `created_at` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub(crate) struct NewRoomRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_by: Uuid,
}

impl TryFrom<RoomRow> for Room {
    type Error = RowDecodeError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::from_uuid(row.id),
            name: RoomName::new(row.name).map_err(|err| RowDecodeError::new("rooms", err))?,
            created_by: UserId::from_uuid(row.created_by),
            created_at: row.created_at,
        })
    }
}

/// Row struct for reading from the room_members table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = room_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub is_muted: bool,
    pub joined_at: DateTime<Utc>,
}

/// Insertable membership; `joined_at` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_members)]
pub(crate) struct NewMemberRow<'a> {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
}

impl MemberRow {
    pub(crate) fn is_administrator(&self) -> bool {
        self.role == Role::Administrator.as_str()
    }
}

impl TryFrom<MemberRow> for Membership {
    type Error = RowDecodeError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: RoomId::from_uuid(row.room_id),
            user_id: UserId::from_uuid(row.user_id),
            role: Role::from_str(&row.role).map_err(|err| RowDecodeError::new("room_members", err))?,
            is_muted: row.is_muted,
            joined_at: row.joined_at,
        })
    }
}

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable message; `seq` and `created_at` are assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: &'a str,
}

impl TryFrom<MessageRow> for Message {
    type Error = RowDecodeError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::from_uuid(row.id),
            channel: Channel::from(row.room_id.map(RoomId::from_uuid)),
            sender_id: UserId::from_uuid(row.sender_id),
            content: MessageContent::new(row.content)
                .map_err(|err| RowDecodeError::new("messages", err))?,
            created_at: row.created_at,
        })
    }
}
