//! Port for room persistence.
//!
//! Room creation and the founder's administrator membership are one unit of
//! work: adapters must commit both or neither.

use async_trait::async_trait;

use crate::domain::{Room, RoomId, RoomName, RoomSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by room repository adapters.
    pub enum RoomRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "room repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "room repository query failed: {message}",
    }
}

/// Room to create. The store assigns `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    /// Pre-allocated identifier.
    pub id: RoomId,
    /// Validated name.
    pub name: RoomName,
    /// Creator, who becomes the room's first administrator.
    pub created_by: UserId,
}

/// Port for creating and listing rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert the room and an administrator membership for its creator.
    async fn create_room_with_founder(&self, room: &NewRoom) -> Result<Room, RoomRepositoryError>;

    /// All rooms, newest first, with creator attributes and member counts.
    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, RoomRepositoryError>;
}

/// Fixture repository for tests that never reach room storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoomRepository;

#[async_trait]
impl RoomRepository for FixtureRoomRepository {
    async fn create_room_with_founder(&self, room: &NewRoom) -> Result<Room, RoomRepositoryError> {
        Ok(Room {
            id: room.id,
            name: room.name.clone(),
            created_by: room.created_by.clone(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, RoomRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_echoes_created_room() {
        let new_room = NewRoom {
            id: RoomId::random(),
            name: RoomName::new("general").expect("valid name"),
            created_by: UserId::random(),
        };
        let room = FixtureRoomRepository
            .create_room_with_founder(&new_room)
            .await
            .expect("fixture create");
        assert_eq!(room.id, new_room.id);
        assert_eq!(room.created_by, new_room.created_by);
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = RoomRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
