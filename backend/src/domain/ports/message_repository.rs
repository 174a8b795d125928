//! Port for the append-only message log.

use async_trait::async_trait;

use crate::domain::{Channel, Message, NewMessage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "message repository query failed: {message}",
    }
}

/// Port for appending and reading channel messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message. The store assigns `created_at`.
    async fn append(&self, message: &NewMessage) -> Result<Message, MessageRepositoryError>;

    /// Newest `limit` messages of `channel`, newest first.
    async fn list_recent(
        &self,
        channel: Channel,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError>;
}

/// Fixture log that accepts appends and never returns history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageRepository;

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn append(&self, message: &NewMessage) -> Result<Message, MessageRepositoryError> {
        Ok(Message {
            id: message.id,
            channel: message.channel,
            sender_id: message.sender_id.clone(),
            content: message.content.clone(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_recent(
        &self,
        _channel: Channel,
        _limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(Vec::new())
    }
}
