//! Port for room membership persistence.
//!
//! Mutations are single atomic steps at the store. Role and mute updates
//! only touch an existing row, so a concurrent kick always wins: once a
//! membership is gone nothing here can bring it back.

use async_trait::async_trait;

use crate::domain::{MemberProfile, Membership, Role, RoomId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "membership repository query failed: {message}",
        /// The room does not exist.
        RoomNotFound { room_id: String } =>
            "room {room_id} does not exist",
        /// No membership row matched the update.
        MissingMembership { user_id: String } =>
            "user {user_id} is not a member of the room",
        /// The change would leave the room without an administrator.
        LastAdministrator { user_id: String } =>
            "user {user_id} is the room's last administrator",
    }
}

/// Port for reading and mutating room memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert a membership, or return the existing one untouched.
    async fn create_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError>;

    /// Membership of `user_id` in `room_id`, if any.
    async fn find_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError>;

    /// Members of a room joined with their profiles, most recent joiners first.
    async fn list_members(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<MemberProfile>, MembershipRepositoryError>;

    /// Change the role of an existing member.
    async fn set_role(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError>;

    /// Set or clear the mute flag of an existing member.
    async fn set_muted(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        is_muted: bool,
    ) -> Result<Membership, MembershipRepositoryError>;

    /// Delete a membership. Returns whether a row was removed.
    async fn remove_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<bool, MembershipRepositoryError>;
}

/// Fixture repository in which nobody is a member of anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembershipRepository;

#[async_trait]
impl MembershipRepository for FixtureMembershipRepository {
    async fn create_membership(
        &self,
        room_id: &RoomId,
        _user_id: &UserId,
        _role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        Err(MembershipRepositoryError::room_not_found(room_id.to_string()))
    }

    async fn find_membership(
        &self,
        _room_id: &RoomId,
        _user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError> {
        Ok(None)
    }

    async fn list_members(
        &self,
        _room_id: &RoomId,
    ) -> Result<Vec<MemberProfile>, MembershipRepositoryError> {
        Ok(Vec::new())
    }

    async fn set_role(
        &self,
        _room_id: &RoomId,
        user_id: &UserId,
        _role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        Err(MembershipRepositoryError::missing_membership(
            user_id.to_string(),
        ))
    }

    async fn set_muted(
        &self,
        _room_id: &RoomId,
        user_id: &UserId,
        _is_muted: bool,
    ) -> Result<Membership, MembershipRepositoryError> {
        Err(MembershipRepositoryError::missing_membership(
            user_id.to_string(),
        ))
    }

    async fn remove_membership(
        &self,
        _room_id: &RoomId,
        _user_id: &UserId,
    ) -> Result<bool, MembershipRepositoryError> {
        Ok(false)
    }
}
