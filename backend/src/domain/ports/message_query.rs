//! Driving port for reading channel history.

use async_trait::async_trait;

use crate::domain::{Channel, Error, MessageView, UserId};

/// Request for the most recent messages of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecentRequest {
    /// Authenticated caller.
    pub actor_id: UserId,
    /// Channel to read.
    pub channel: Channel,
}

/// Up to the history limit of messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecentResponse {
    /// Messages joined with current sender attributes.
    pub messages: Vec<MessageView>,
}

/// Driving port for message reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageQuery: Send + Sync {
    /// Read the newest messages of a channel in chronological order.
    async fn fetch_recent(&self, request: FetchRecentRequest)
    -> Result<FetchRecentResponse, Error>;
}

/// Fixture query with an empty history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageQuery;

#[async_trait]
impl MessageQuery for FixtureMessageQuery {
    async fn fetch_recent(
        &self,
        _request: FetchRecentRequest,
    ) -> Result<FetchRecentResponse, Error> {
        Ok(FetchRecentResponse {
            messages: Vec::new(),
        })
    }
}
