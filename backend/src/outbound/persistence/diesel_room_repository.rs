//! PostgreSQL-backed `RoomRepository` implementation using Diesel ORM.
//!
//! Room creation inserts the room and its founder's administrator
//! membership in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewRoom, RoomRepository, RoomRepositoryError};
use crate::domain::{DisplayName, Role, Room, RoomSummary};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewMemberRow, NewRoomRow, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{room_members, rooms, users};

/// Diesel-backed implementation of the room repository port.
#[derive(Clone)]
pub struct DieselRoomRepository {
    pool: DbPool,
}

impl DieselRoomRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RoomRepositoryError {
    map_basic_pool_error(error, RoomRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoomRepositoryError {
    map_basic_diesel_error(
        error,
        RoomRepositoryError::query,
        RoomRepositoryError::connection,
    )
}

fn to_room(row: RoomRow) -> Result<Room, RoomRepositoryError> {
    Room::try_from(row).map_err(|err| RoomRepositoryError::query(err.to_string()))
}

#[async_trait]
impl RoomRepository for DieselRoomRepository {
    async fn create_room_with_founder(&self, room: &NewRoom) -> Result<Room, RoomRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let room_row = NewRoomRow {
            id: *room.id.as_uuid(),
            name: room.name.as_ref(),
            created_by: *room.created_by.as_uuid(),
        };
        let founder_row = NewMemberRow {
            room_id: *room.id.as_uuid(),
            user_id: *room.created_by.as_uuid(),
            role: Role::Administrator.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let created = conn
            .transaction(|conn| {
                async move {
                    let created = diesel::insert_into(rooms::table)
                        .values(&room_row)
                        .returning(RoomRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(room_members::table)
                        .values(&founder_row)
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(created)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        to_room(created)
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(RoomRow, Option<String>, Option<String>)> = rooms::table
            .left_join(users::table)
            .order((rooms::created_at.desc(), rooms::id.asc()))
            .select((
                RoomRow::as_select(),
                users::display_name.nullable(),
                users::avatar_ref.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let counts: HashMap<Uuid, i64> = room_members::table
            .group_by(room_members::room_id)
            .select((room_members::room_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|(row, creator_name, creator_avatar)| {
                let member_count = counts.get(&row.id).copied().unwrap_or_default();
                Ok(RoomSummary {
                    room: to_room(row)?,
                    creator_name: creator_name.and_then(|name| DisplayName::new(name).ok()),
                    creator_avatar,
                    member_count: u64::try_from(member_count).unwrap_or_default(),
                })
            })
            .collect()
    }
}
