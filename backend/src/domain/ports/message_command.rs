//! Driving port for posting messages.

use async_trait::async_trait;

use crate::domain::{Channel, Error, Message, MessageContent, MessageId, UserId};

/// Request to post a message to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Target channel.
    pub channel: Channel,
    /// Raw content as submitted; validated by the service.
    pub content: String,
}

/// The stored message. Sender attributes are not echoed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageResponse {
    /// Created message.
    pub message: Message,
}

/// Driving port for message writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageCommand: Send + Sync {
    /// Validate, authorize, and append a message.
    async fn post_message(&self, request: PostMessageRequest)
    -> Result<PostMessageResponse, Error>;
}

/// Fixture command that validates content and echoes it back.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageCommand;

#[async_trait]
impl MessageCommand for FixtureMessageCommand {
    async fn post_message(
        &self,
        request: PostMessageRequest,
    ) -> Result<PostMessageResponse, Error> {
        let content = MessageContent::new(&request.content)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(PostMessageResponse {
            message: Message {
                id: MessageId::random(),
                channel: request.channel,
                sender_id: request.actor_id,
                content,
                created_at: chrono::Utc::now(),
            },
        })
    }
}
