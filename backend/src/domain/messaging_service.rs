//! Messaging service.
//!
//! Implements [`MessageCommand`] and [`MessageQuery`] for both room channels
//! and the global channel. History reads take the newest
//! [`MESSAGE_HISTORY_LIMIT`] rows from the store (newest first), flip them
//! into chronological order, and join sender attributes at read time.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::authorization;
use super::service_support::{
    denied, invalid_field, map_directory_error, map_membership_error, map_message_error,
    resolve_actor,
};
use crate::domain::ports::{
    FetchRecentRequest, FetchRecentResponse, MembershipRepository, MessageCommand, MessageQuery,
    MessageRepository, PostMessageRequest, PostMessageResponse, UserDirectory,
};
use crate::domain::{
    Channel, Error, MESSAGE_HISTORY_LIMIT, Membership, Message, MessageContent, MessageId,
    MessageValidationError, MessageView, NewMessage, SenderProfile, UserId, UserProfile,
};

/// Messaging service backed by the message log, membership store, and user
/// directory.
pub struct MessagingService<G, M, D> {
    messages: Arc<G>,
    members: Arc<M>,
    directory: Arc<D>,
}

impl<G, M, D> MessagingService<G, M, D> {
    /// Create a new service over the given ports.
    pub fn new(messages: Arc<G>, members: Arc<M>, directory: Arc<D>) -> Self {
        Self {
            messages,
            members,
            directory,
        }
    }
}

impl<G, M, D> MessagingService<G, M, D>
where
    G: MessageRepository,
    M: MembershipRepository,
    D: UserDirectory,
{
    /// Membership backing a room channel; the global channel has none.
    async fn channel_membership(
        &self,
        channel: Channel,
        user_id: &UserId,
        operation: &'static str,
    ) -> Result<Option<Membership>, Error> {
        match channel {
            Channel::Global => Ok(None),
            Channel::Room(room_id) => self
                .members
                .find_membership(&room_id, user_id)
                .await
                .map_err(map_membership_error(operation)),
        }
    }

    async fn sender_profiles(
        &self,
        messages: &[Message],
    ) -> Result<HashMap<UserId, UserProfile>, Error> {
        let mut ids: Vec<UserId> = messages.iter().map(|m| m.sender_id.clone()).collect();
        ids.sort_by(|a, b| a.as_uuid().cmp(b.as_uuid()));
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = self
            .directory
            .find_profiles(&ids)
            .await
            .map_err(map_directory_error("fetch_recent"))?;
        Ok(profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect())
    }
}

fn parse_content(raw: &str) -> Result<MessageContent, Error> {
    MessageContent::new(raw).map_err(|err| {
        let code = match err {
            MessageValidationError::EmptyContent => "empty_content",
            MessageValidationError::ContentTooLong { .. } => "content_too_long",
        };
        invalid_field("content", code, err)
    })
}

fn sender_of(profile: Option<&UserProfile>) -> SenderProfile {
    match profile {
        Some(profile) => SenderProfile {
            display_name: Some(profile.display_name.clone()),
            avatar_ref: profile.avatar_ref.clone(),
            is_verified_owner: profile.is_verified_owner,
        },
        None => SenderProfile {
            display_name: None,
            avatar_ref: None,
            is_verified_owner: false,
        },
    }
}

#[async_trait]
impl<G, M, D> MessageCommand for MessagingService<G, M, D>
where
    G: MessageRepository,
    M: MembershipRepository,
    D: UserDirectory,
{
    async fn post_message(
        &self,
        request: PostMessageRequest,
    ) -> Result<PostMessageResponse, Error> {
        let profile = resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        let membership = self
            .channel_membership(request.channel, &profile.id, "post_message")
            .await?;
        authorization::can_post(request.channel, membership.as_ref())
            .map_err(denied("post_message", &profile.id))?;
        let content = parse_content(&request.content)?;

        let message = self
            .messages
            .append(&NewMessage {
                id: MessageId::random(),
                channel: request.channel,
                sender_id: profile.id,
                content,
            })
            .await
            .map_err(map_message_error("post_message"))?;
        tracing::debug!(channel = %message.channel, message_id = %message.id, "message appended");

        Ok(PostMessageResponse { message })
    }
}

#[async_trait]
impl<G, M, D> MessageQuery for MessagingService<G, M, D>
where
    G: MessageRepository,
    M: MembershipRepository,
    D: UserDirectory,
{
    async fn fetch_recent(
        &self,
        request: FetchRecentRequest,
    ) -> Result<FetchRecentResponse, Error> {
        let profile = resolve_actor(self.directory.as_ref(), &request.actor_id).await?;
        let membership = self
            .channel_membership(request.channel, &profile.id, "fetch_recent")
            .await?;
        authorization::can_read(request.channel, membership.as_ref())
            .map_err(denied("fetch_recent", &profile.id))?;

        let mut newest_first = self
            .messages
            .list_recent(request.channel, MESSAGE_HISTORY_LIMIT)
            .await
            .map_err(map_message_error("fetch_recent"))?;
        newest_first.truncate(MESSAGE_HISTORY_LIMIT);
        newest_first.reverse();
        let chronological = newest_first;

        let senders = self.sender_profiles(&chronological).await?;
        let messages = chronological
            .into_iter()
            .map(|message| {
                let sender = sender_of(senders.get(&message.sender_id));
                MessageView { message, sender }
            })
            .collect();

        Ok(FetchRecentResponse { messages })
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
