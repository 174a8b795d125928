//! PostgreSQL-backed `MembershipRepository` implementation using Diesel ORM.
//!
//! Role changes and removals run inside a transaction that first locks the
//! room's administrator rows (ordered by user id) and then the target row.
//! Every writer takes the locks in the same order, so concurrent demotions
//! cannot both pass the last-administrator check and a kick cannot be undone
//! by a role change that started before it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{MemberProfile, Membership, Role, RoomId, UserId, UserProfile};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{MemberRow, NewMemberRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{room_members, users};

const ROOM_FOREIGN_KEY: &str = "room_members_room_id_fkey";

/// Diesel-backed implementation of the membership repository port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a membership transaction.
enum TxError {
    Diesel(diesel::result::Error),
    Domain(MembershipRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> MembershipRepositoryError {
    map_basic_pool_error(error, MembershipRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MembershipRepositoryError {
    map_basic_diesel_error(
        error,
        MembershipRepositoryError::query,
        MembershipRepositoryError::connection,
    )
}

fn map_tx_error(error: TxError) -> MembershipRepositoryError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::Domain(error) => error,
    }
}

fn to_membership(row: MemberRow) -> Result<Membership, MembershipRepositoryError> {
    Membership::try_from(row).map_err(|err| MembershipRepositoryError::query(err.to_string()))
}

fn to_member_profile(
    (member, user): (MemberRow, UserRow),
) -> Result<MemberProfile, MembershipRepositoryError> {
    let profile =
        UserProfile::try_from(user).map_err(|err| MembershipRepositoryError::query(err.to_string()))?;
    Ok(MemberProfile {
        membership: to_membership(member)?,
        profile,
    })
}

/// Lock the room's administrator rows, then the target row.
///
/// Returns the number of administrators and the target row, if present.
async fn lock_for_update(
    conn: &mut AsyncPgConnection,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<(usize, Option<MemberRow>), diesel::result::Error> {
    let administrators: Vec<Uuid> = room_members::table
        .filter(room_members::room_id.eq(room_id))
        .filter(room_members::role.eq(Role::Administrator.as_str()))
        .order(room_members::user_id.asc())
        .select(room_members::user_id)
        .for_update()
        .load(conn)
        .await?;
    let target = room_members::table
        .find((room_id, user_id))
        .select(MemberRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok((administrators.len(), target))
}

fn guard_last_administrator(
    administrators: usize,
    target: &MemberRow,
    user_id: &UserId,
) -> Result<(), TxError> {
    if target.is_administrator() && administrators <= 1 {
        return Err(TxError::Domain(MembershipRepositoryError::last_administrator(
            user_id.to_string(),
        )));
    }
    Ok(())
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn create_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        let row = NewMemberRow {
            room_id: *room_id.as_uuid(),
            user_id: *user_id.as_uuid(),
            role: role.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The no-op update returns the existing row without changing it.
        let result = diesel::insert_into(room_members::table)
            .values(&row)
            .on_conflict((room_members::room_id, room_members::user_id))
            .do_update()
            .set(room_members::role.eq(room_members::role))
            .returning(MemberRow::as_returning())
            .get_result(&mut conn)
            .await;

        match result {
            Ok(stored) => to_membership(stored),
            Err(error) if is_foreign_key_violation(&error, Some(ROOM_FOREIGN_KEY)) => Err(
                MembershipRepositoryError::room_not_found(room_id.to_string()),
            ),
            Err(error) => Err(map_diesel_error(error)),
        }
    }

    async fn find_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = room_members::table
            .find((*room_id.as_uuid(), *user_id.as_uuid()))
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_membership).transpose()
    }

    async fn list_members(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<MemberProfile>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(MemberRow, UserRow)> = room_members::table
            .inner_join(users::table)
            .filter(room_members::room_id.eq(*room_id.as_uuid()))
            .order((room_members::joined_at.desc(), room_members::user_id.asc()))
            .select((MemberRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_member_profile).collect()
    }

    async fn set_role(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let room_uuid = *room_id.as_uuid();
        let user_uuid = *user_id.as_uuid();
        let user_id = user_id.clone();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = conn
            .transaction(|conn| {
                async move {
                    let (administrators, target) =
                        lock_for_update(conn, room_uuid, user_uuid).await?;
                    let Some(target) = target else {
                        return Err(TxError::Domain(
                            MembershipRepositoryError::missing_membership(user_id.to_string()),
                        ));
                    };
                    if role != Role::Administrator {
                        guard_last_administrator(administrators, &target, &user_id)?;
                    }
                    let updated = diesel::update(room_members::table.find((room_uuid, user_uuid)))
                        .set(room_members::role.eq(role.as_str()))
                        .returning(MemberRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, TxError>(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        to_membership(updated)
    }

    async fn set_muted(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        is_muted: bool,
    ) -> Result<Membership, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            room_members::table.find((*room_id.as_uuid(), *user_id.as_uuid())),
        )
        .set(room_members::is_muted.eq(is_muted))
        .returning(MemberRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => to_membership(row),
            None => Err(MembershipRepositoryError::missing_membership(
                user_id.to_string(),
            )),
        }
    }

    async fn remove_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<bool, MembershipRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let room_uuid = *room_id.as_uuid();
        let user_uuid = *user_id.as_uuid();
        let user_id = user_id.clone();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let (administrators, target) = lock_for_update(conn, room_uuid, user_uuid).await?;
                let Some(target) = target else {
                    return Ok(false);
                };
                guard_last_administrator(administrators, &target, &user_id)?;
                let removed = diesel::delete(room_members::table.find((room_uuid, user_uuid)))
                    .execute(conn)
                    .await?;
                Ok::<_, TxError>(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}
