//! Snapshot sources polled by the sync loop.
//!
//! [`RoomFeed`] is the seam between the poller and the network;
//! [`HttpRoomFeed`] is the reqwest adapter against `/api/v1`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SyncError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SESSION_COOKIE_NAME: &str = "session";

/// Message stream followed by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRef {
    /// A room's messages; readable by members only.
    Room(Uuid),
    /// The room-less channel every signed-in user shares.
    Global,
}

/// Message as listed by the server, joined with its sender's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntry {
    /// Message identifier.
    pub id: Uuid,
    /// Owning room; `None` for the global channel.
    pub room_id: Option<Uuid>,
    /// Author.
    pub sender_id: Uuid,
    /// Trimmed message text.
    pub content: String,
    /// RFC 3339 creation time assigned by the server.
    pub created_at: String,
    /// Sender display name; `None` once the profile is gone.
    pub sender_name: Option<String>,
    /// Sender avatar reference.
    pub sender_avatar: Option<String>,
    /// Cosmetic verification badge.
    pub is_verified_owner: bool,
}

/// Room member as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    /// Member identifier.
    pub user_id: Uuid,
    /// `administrator`, `moderator`, or `user`.
    pub role: String,
    /// Whether the member may currently post.
    pub is_muted: bool,
    /// RFC 3339 join time.
    pub joined_at: String,
    /// Current display name.
    pub display_name: String,
    /// Contact address, when the server exposes it.
    pub email: Option<String>,
    /// Avatar reference.
    pub avatar_ref: Option<String>,
    /// Cosmetic verification badge.
    pub is_verified_owner: bool,
}

/// Source of room snapshots. Each call is one idempotent read.
#[async_trait]
pub trait RoomFeed: Send + Sync {
    /// The channel's most recent messages, oldest first.
    async fn fetch_messages(&self, channel: ChannelRef) -> Result<Vec<MessageEntry>, SyncError>;

    /// The room's members, most recent joiners first.
    async fn fetch_members(&self, room_id: Uuid) -> Result<Vec<MemberEntry>, SyncError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    details: Option<ErrorDetails>,
}

#[derive(Deserialize)]
struct ErrorDetails {
    code: Option<String>,
}

/// Feed that reads from the chat server over HTTP with a session cookie.
pub struct HttpRoomFeed {
    client: Client,
    base_url: Url,
    cookie: String,
}

impl HttpRoomFeed {
    /// Feed for the server at `base_url`, authenticating with the value of
    /// the `session` cookie issued at login.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] when the reqwest client cannot be
    /// constructed.
    pub fn new(base_url: Url, session: impl AsRef<str>) -> Result<Self, SyncError> {
        Self::with_timeout(base_url, session, DEFAULT_REQUEST_TIMEOUT)
    }

    /// As [`HttpRoomFeed::new`] with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] when the reqwest client cannot be
    /// constructed.
    pub fn with_timeout(
        base_url: Url,
        session: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            cookie: format!("{SESSION_COOKIE_NAME}={}", session.as_ref()),
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, SyncError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = endpoint(&self.base_url, path)?;
        let response = self
            .client
            .get(url)
            .header(header::COOKIE, self.cookie.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| SyncError::Decode {
            message: error.to_string(),
        })
    }
}

#[async_trait]
impl RoomFeed for HttpRoomFeed {
    async fn fetch_messages(&self, channel: ChannelRef) -> Result<Vec<MessageEntry>, SyncError> {
        self.get_json(&messages_path(channel)).await
    }

    async fn fetch_members(&self, room_id: Uuid) -> Result<Vec<MemberEntry>, SyncError> {
        self.get_json(&format!("api/v1/rooms/{room_id}/members")).await
    }
}

fn messages_path(channel: ChannelRef) -> String {
    match channel {
        ChannelRef::Room(room_id) => format!("api/v1/rooms/{room_id}/messages"),
        ChannelRef::Global => "api/v1/messages".to_owned(),
    }
}

/// Resolve `path` below `base`, treating `base` as a directory even when it
/// lacks a trailing slash.
fn endpoint(base: &Url, path: &str) -> Result<Url, SyncError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(path).map_err(|error| SyncError::InvalidUrl {
        message: error.to_string(),
    })
}

fn status_error(status: StatusCode, body: &[u8]) -> SyncError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    let (message, reason) = match parsed {
        Some(error) => (error.message, error.details.and_then(|d| d.code)),
        None => (
            status.canonical_reason().unwrap_or("unexpected status").to_owned(),
            None,
        ),
    };
    SyncError::Status {
        status: status.as_u16(),
        reason,
        message,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://chat.test", "https://chat.test/api/v1/messages")]
    #[case("https://chat.test/", "https://chat.test/api/v1/messages")]
    #[case("https://chat.test/chat", "https://chat.test/chat/api/v1/messages")]
    fn endpoints_resolve_below_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let base: Url = base.parse().expect("base url");
        let url = endpoint(&base, &messages_path(ChannelRef::Global)).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn room_messages_path_names_the_room() {
        let room_id = Uuid::nil();
        assert_eq!(
            messages_path(ChannelRef::Room(room_id)),
            format!("api/v1/rooms/{room_id}/messages")
        );
    }

    #[rstest]
    fn error_bodies_surface_reason_codes() {
        let body = br#"{"code":"muted","message":"You are muted in this room","traceId":"t","details":{"code":"muted"}}"#;
        let error = status_error(StatusCode::FORBIDDEN, body);
        assert_eq!(
            error,
            SyncError::Status {
                status: 403,
                reason: Some("muted".to_owned()),
                message: "You are muted in this room".to_owned(),
            }
        );
    }

    #[rstest]
    fn unparseable_error_bodies_fall_back_to_the_status_text() {
        let error = status_error(StatusCode::UNAUTHORIZED, b"<html>");
        assert!(error.is_unauthorized());
        assert_eq!(
            error,
            SyncError::Status {
                status: 401,
                reason: None,
                message: "Unauthorized".to_owned(),
            }
        );
    }

    #[rstest]
    fn message_entries_decode_server_json() {
        let json = r#"[{
            "id": "00000000-0000-0000-0000-000000000001",
            "roomId": null,
            "senderId": "00000000-0000-0000-0000-000000000002",
            "content": "hello",
            "createdAt": "2026-03-01T09:00:00+00:00",
            "senderName": null,
            "senderAvatar": null,
            "isVerifiedOwner": false
        }]"#;
        let entries: Vec<MessageEntry> = serde_json::from_str(json).expect("decodes");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].room_id, None);
        assert_eq!(entries[0].sender_name, None);
    }
}
