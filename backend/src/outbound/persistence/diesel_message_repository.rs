//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.
//!
//! `created_at` comes from `clock_timestamp()` in the database, never from
//! the caller. `seq` breaks ties between rows sharing a timestamp.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Channel, Message, NewMessage};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::messages;

/// Diesel-backed implementation of the message repository port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MessageRepositoryError {
    map_basic_pool_error(error, MessageRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MessageRepositoryError {
    map_basic_diesel_error(
        error,
        MessageRepositoryError::query,
        MessageRepositoryError::connection,
    )
}

fn to_message(row: MessageRow) -> Result<Message, MessageRepositoryError> {
    Message::try_from(row).map_err(|err| MessageRepositoryError::query(err.to_string()))
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn append(&self, message: &NewMessage) -> Result<Message, MessageRepositoryError> {
        let row = NewMessageRow {
            id: *message.id.as_uuid(),
            room_id: message.channel.room_id().map(|id| *id.as_uuid()),
            sender_id: *message.sender_id.as_uuid(),
            content: message.content.as_ref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = diesel::insert_into(messages::table)
            .values(&row)
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_message(stored)
    }

    async fn list_recent(
        &self,
        channel: Channel,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut query = messages::table
            .select(MessageRow::as_select())
            .order((messages::created_at.desc(), messages::seq.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .into_boxed();
        query = match channel.room_id() {
            Some(room_id) => query.filter(messages::room_id.eq(*room_id.as_uuid())),
            None => query.filter(messages::room_id.is_null()),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(to_message).collect()
    }
}
