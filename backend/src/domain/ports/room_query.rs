//! Driving port for room reads.

use async_trait::async_trait;

use crate::domain::{Error, MemberProfile, RoomId, RoomSummary, UserId};

/// Request to list every room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoomsRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
}

/// Rooms ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoomsResponse {
    /// Room summaries.
    pub rooms: Vec<RoomSummary>,
}

/// Request to list a room's members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMembersRequest {
    /// Authenticated caller; must operate the room.
    pub actor_id: UserId,
    /// Room to inspect.
    pub room_id: RoomId,
}

/// Members ordered by most recent join first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMembersResponse {
    /// Members with profile attributes.
    pub members: Vec<MemberProfile>,
}

/// Driving port for room read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomQuery: Send + Sync {
    /// List all rooms. Room existence is visible to every authenticated user.
    async fn list_rooms(&self, request: ListRoomsRequest) -> Result<ListRoomsResponse, Error>;

    /// List members of a room the caller administers.
    async fn list_members(&self, request: ListMembersRequest)
    -> Result<ListMembersResponse, Error>;
}

/// Fixture query returning empty listings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoomQuery;

#[async_trait]
impl RoomQuery for FixtureRoomQuery {
    async fn list_rooms(&self, _request: ListRoomsRequest) -> Result<ListRoomsResponse, Error> {
        Ok(ListRoomsResponse { rooms: Vec::new() })
    }

    async fn list_members(
        &self,
        _request: ListMembersRequest,
    ) -> Result<ListMembersResponse, Error> {
        Ok(ListMembersResponse {
            members: Vec::new(),
        })
    }
}
