//! Room service.
//!
//! Implements [`RoomCommand`] and [`RoomQuery`]: room creation with its
//! founding administrator, self-join, member listing, and member
//! administration. Every decision goes through [`authorization`]; every
//! mutation is a single atomic call on the membership store.

use std::sync::Arc;

use async_trait::async_trait;

use super::authorization;
use super::service_support::{
    denied, invalid_field, map_membership_error, map_room_error, resolve_actor,
};
use crate::domain::ports::{
    AdministerMemberRequest, AdministerMemberResponse, CreateRoomRequest, CreateRoomResponse,
    JoinRoomRequest, JoinRoomResponse, ListMembersRequest, ListMembersResponse, ListRoomsRequest,
    ListRoomsResponse, MembershipRepository, NewRoom, RoomCommand, RoomQuery, RoomRepository,
    UserDirectory,
};
use crate::domain::{
    Error, MemberAction, Role, RoomId, RoomName, RoomSummary, RoomValidationError,
};

/// Room service backed by room, membership, and user directory ports.
pub struct RoomService<R, M, D> {
    rooms: Arc<R>,
    members: Arc<M>,
    directory: Arc<D>,
}

impl<R, M, D> RoomService<R, M, D> {
    /// Create a new service over the given ports.
    pub fn new(rooms: Arc<R>, members: Arc<M>, directory: Arc<D>) -> Self {
        Self {
            rooms,
            members,
            directory,
        }
    }
}

fn parse_room_name(raw: &str) -> Result<RoomName, Error> {
    RoomName::new(raw).map_err(|err| {
        let code = match err {
            RoomValidationError::EmptyName => "empty_name",
            RoomValidationError::NameTooLong { .. } => "name_too_long",
            RoomValidationError::InvalidId => "invalid_room_id",
        };
        invalid_field("name", code, err)
    })
}

#[async_trait]
impl<R, M, D> RoomCommand for RoomService<R, M, D>
where
    R: RoomRepository,
    M: MembershipRepository,
    D: UserDirectory,
{
    async fn create_room(&self, request: CreateRoomRequest) -> Result<CreateRoomResponse, Error> {
        let profile = resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        authorization::can_create_room(&profile.actor())
            .map_err(denied("create_room", &profile.id))?;
        let name = parse_room_name(&request.name)?;

        let room = self
            .rooms
            .create_room_with_founder(&NewRoom {
                id: RoomId::random(),
                name,
                created_by: profile.id.clone(),
            })
            .await
            .map_err(map_room_error("create_room"))?;
        tracing::info!(room_id = %room.id, created_by = %room.created_by, "room created");

        Ok(CreateRoomResponse {
            room: RoomSummary {
                room,
                creator_name: Some(profile.display_name),
                creator_avatar: profile.avatar_ref,
                member_count: 1,
            },
        })
    }

    async fn join_room(&self, request: JoinRoomRequest) -> Result<JoinRoomResponse, Error> {
        let profile = resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        let membership = self
            .members
            .create_membership(&request.room_id, &profile.id, Role::User)
            .await
            .map_err(map_membership_error("join_room"))?;
        tracing::info!(room_id = %request.room_id, user_id = %profile.id, "room joined");
        Ok(JoinRoomResponse { membership })
    }

    async fn administer_member(
        &self,
        request: AdministerMemberRequest,
    ) -> Result<AdministerMemberResponse, Error> {
        let AdministerMemberRequest {
            actor_id,
            room_id,
            target_id,
            action,
        } = request;
        let profile = resolve_actor(self.directory.as_ref(), &actor_id).await?;
        let operation = action.label();

        let own = self
            .members
            .find_membership(&room_id, &profile.id)
            .await
            .map_err(map_membership_error(operation))?;
        authorization::can_administer(own.as_ref()).map_err(denied(operation, &profile.id))?;

        match action {
            MemberAction::Kick => {
                let removed = self
                    .members
                    .remove_membership(&room_id, &target_id)
                    .await
                    .map_err(map_membership_error(operation))?;
                if !removed {
                    tracing::debug!(%room_id, %target_id, "kick target already absent");
                }
            }
            MemberAction::Mute | MemberAction::Unmute => {
                self.members
                    .set_muted(&room_id, &target_id, action == MemberAction::Mute)
                    .await
                    .map_err(map_membership_error(operation))?;
            }
            MemberAction::SetRole(role) => {
                authorization::can_assign_role(role).map_err(denied(operation, &profile.id))?;
                self.members
                    .set_role(&room_id, &target_id, role)
                    .await
                    .map_err(map_membership_error(operation))?;
            }
        }

        tracing::info!(
            action = operation,
            %room_id,
            actor = %profile.id,
            target = %target_id,
            "member administered"
        );
        Ok(AdministerMemberResponse {
            message: action.confirmation().to_owned(),
        })
    }
}

#[async_trait]
impl<R, M, D> RoomQuery for RoomService<R, M, D>
where
    R: RoomRepository,
    M: MembershipRepository,
    D: UserDirectory,
{
    async fn list_rooms(&self, request: ListRoomsRequest) -> Result<ListRoomsResponse, Error> {
        resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        let rooms = self
            .rooms
            .list_rooms()
            .await
            .map_err(map_room_error("list_rooms"))?;
        Ok(ListRoomsResponse { rooms })
    }

    async fn list_members(
        &self,
        request: ListMembersRequest,
    ) -> Result<ListMembersResponse, Error> {
        let profile = resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        let own = self
            .members
            .find_membership(&request.room_id, &profile.id)
            .await
            .map_err(map_membership_error("list_members"))?;
        authorization::can_administer(own.as_ref()).map_err(denied("list_members", &profile.id))?;

        let members = self
            .members
            .list_members(&request.room_id)
            .await
            .map_err(map_membership_error("list_members"))?;
        Ok(ListMembersResponse { members })
    }
}

#[cfg(test)]
#[path = "room_service_tests.rs"]
mod tests;
