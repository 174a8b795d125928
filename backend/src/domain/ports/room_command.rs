//! Driving port for room mutations: creation, self-join, and member
//! administration.

use async_trait::async_trait;

use crate::domain::{
    Error, MemberAction, Membership, Role, Room, RoomId, RoomName, RoomSummary, UserId,
};

/// Request to create a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Raw name as submitted; validated by the service.
    pub name: String,
}

/// Response from creating a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomResponse {
    /// The new room with its founder's attributes.
    pub room: RoomSummary,
}

/// Request to join a room as an ordinary user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Room to join.
    pub room_id: RoomId,
}

/// Response from joining a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomResponse {
    /// The caller's membership, new or pre-existing.
    pub membership: Membership,
}

/// Request to kick, mute, unmute, or re-role a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministerMemberRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Room the target belongs to.
    pub room_id: RoomId,
    /// Member being acted upon.
    pub target_id: UserId,
    /// Action to apply.
    pub action: MemberAction,
}

/// Response from a member administration action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministerMemberResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Driving port for room write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomCommand: Send + Sync {
    /// Create a room and seed the caller as its administrator.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use roomchat::domain::UserId;
    /// # use roomchat::domain::ports::{CreateRoomRequest, FixtureRoomCommand, RoomCommand};
    /// # async fn example() -> Result<(), roomchat::domain::Error> {
    /// let response = FixtureRoomCommand
    ///     .create_room(CreateRoomRequest {
    ///         actor_id: UserId::random(),
    ///         name: "general".to_owned(),
    ///     })
    ///     .await?;
    /// assert_eq!(response.room.room.name.as_ref(), "general");
    /// # Ok(())
    /// # }
    /// ```
    async fn create_room(&self, request: CreateRoomRequest) -> Result<CreateRoomResponse, Error>;

    /// Join a room with role `user`. Joining twice returns the existing row.
    async fn join_room(&self, request: JoinRoomRequest) -> Result<JoinRoomResponse, Error>;

    /// Apply an administrative action to a member.
    async fn administer_member(
        &self,
        request: AdministerMemberRequest,
    ) -> Result<AdministerMemberResponse, Error>;
}

/// Fixture command that validates input and echoes success.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoomCommand;

#[async_trait]
impl RoomCommand for FixtureRoomCommand {
    async fn create_room(&self, request: CreateRoomRequest) -> Result<CreateRoomResponse, Error> {
        let name = RoomName::new(&request.name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(CreateRoomResponse {
            room: RoomSummary {
                room: Room {
                    id: RoomId::random(),
                    name,
                    created_by: request.actor_id,
                    created_at: chrono::Utc::now(),
                },
                creator_name: None,
                creator_avatar: None,
                member_count: 1,
            },
        })
    }

    async fn join_room(&self, request: JoinRoomRequest) -> Result<JoinRoomResponse, Error> {
        Ok(JoinRoomResponse {
            membership: Membership {
                room_id: request.room_id,
                user_id: request.actor_id,
                role: Role::User,
                is_muted: false,
                joined_at: chrono::Utc::now(),
            },
        })
    }

    async fn administer_member(
        &self,
        request: AdministerMemberRequest,
    ) -> Result<AdministerMemberResponse, Error> {
        Ok(AdministerMemberResponse {
            message: request.action.confirmation().to_owned(),
        })
    }
}
