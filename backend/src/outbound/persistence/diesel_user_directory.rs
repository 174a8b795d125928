//! PostgreSQL-backed `UserDirectory` reading the authentication service's
//! `users` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{UserId, UserProfile};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, UserDirectoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

fn to_profile(row: UserRow) -> Result<UserProfile, UserDirectoryError> {
    UserProfile::try_from(row).map_err(|err| UserDirectoryError::query(err.to_string()))
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(*user_id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_profile).transpose()
    }

    async fn find_profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserDirectoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::id.eq_any(ids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_profile).collect()
    }
}
