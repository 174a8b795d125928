//! Message HTTP handlers for rooms and the global channel.
//!
//! ```text
//! GET  /api/v1/rooms/{room_id}/messages
//! POST /api/v1/rooms/{room_id}/messages
//! GET  /api/v1/messages
//! POST /api/v1/messages
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{FetchRecentRequest, PostMessageRequest};
use crate::domain::{ApiResult, Channel, Message, MessageView, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_room_id;

/// Request payload for posting a message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequestBody {
    #[schema(example = "Hello, room!")]
    pub content: String,
}

/// A stored message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    #[schema(format = "uuid")]
    pub id: String,
    /// `null` for the global channel.
    #[schema(format = "uuid")]
    pub room_id: Option<String>,
    #[schema(format = "uuid")]
    pub sender_id: String,
    pub content: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Message> for MessageBody {
    fn from(value: Message) -> Self {
        Self {
            id: value.id.to_string(),
            room_id: value.channel.room_id().map(|id| id.to_string()),
            sender_id: value.sender_id.to_string(),
            content: value.content.as_ref().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Acknowledgement of a stored post. Sender attributes are not echoed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostedMessageBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub content: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Message> for PostedMessageBody {
    fn from(value: Message) -> Self {
        Self {
            id: value.id.to_string(),
            content: value.content.as_ref().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// A message joined with its sender's current profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageViewBody {
    #[serde(flatten)]
    pub message: MessageBody,
    /// `null` when the sender's profile no longer exists.
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub is_verified_owner: bool,
}

impl From<MessageView> for MessageViewBody {
    fn from(value: MessageView) -> Self {
        let MessageView { message, sender } = value;
        Self {
            message: MessageBody::from(message),
            sender_name: sender.display_name.map(String::from),
            sender_avatar: sender.avatar_ref,
            is_verified_owner: sender.is_verified_owner,
        }
    }
}

async fn fetch_channel(
    state: &HttpState,
    actor_id: UserId,
    channel: Channel,
) -> ApiResult<web::Json<Vec<MessageViewBody>>> {
    let response = state
        .message_queries
        .fetch_recent(FetchRecentRequest { actor_id, channel })
        .await?;
    Ok(web::Json(
        response
            .messages
            .into_iter()
            .map(MessageViewBody::from)
            .collect(),
    ))
}

async fn post_to_channel(
    state: &HttpState,
    actor_id: UserId,
    channel: Channel,
    payload: PostMessageRequestBody,
) -> ApiResult<HttpResponse> {
    let response = state
        .messages
        .post_message(PostMessageRequest {
            actor_id,
            channel,
            content: payload.content,
        })
        .await?;
    Ok(HttpResponse::Created().json(PostedMessageBody::from(response.message)))
}

/// Most recent room messages, oldest first, at most 50.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Room identifier", format = "uuid")),
    responses(
        (status = 200, description = "Messages, oldest first", body = [MessageViewBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of this room", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "listRoomMessages",
    security(("SessionCookie" = []))
)]
#[get("/rooms/{room_id}/messages")]
pub async fn list_room_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MessageViewBody>>> {
    let actor_id = session.require_user_id()?;
    let room_id = parse_room_id(&path.into_inner())?;
    fetch_channel(&state, actor_id, Channel::Room(room_id)).await
}

/// Post to a room. Muted members are refused.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Room identifier", format = "uuid")),
    request_body = PostMessageRequestBody,
    responses(
        (status = 201, description = "Message stored", body = PostedMessageBody),
        (status = 400, description = "Invalid content", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member, or muted", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "postRoomMessage",
    security(("SessionCookie" = []))
)]
#[post("/rooms/{room_id}/messages")]
pub async fn post_room_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PostMessageRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    let room_id = parse_room_id(&path.into_inner())?;
    post_to_channel(&state, actor_id, Channel::Room(room_id), payload.into_inner()).await
}

/// Most recent global messages, oldest first, at most 50.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Messages, oldest first", body = [MessageViewBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "listGlobalMessages",
    security(("SessionCookie" = []))
)]
#[get("/messages")]
pub async fn list_global_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MessageViewBody>>> {
    let actor_id = session.require_user_id()?;
    fetch_channel(&state, actor_id, Channel::Global).await
}

/// Post to the global channel.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = PostMessageRequestBody,
    responses(
        (status = 201, description = "Message stored", body = PostedMessageBody),
        (status = 400, description = "Invalid content", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "postGlobalMessage",
    security(("SessionCookie" = []))
)]
#[post("/messages")]
pub async fn post_global_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostMessageRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    post_to_channel(&state, actor_id, Channel::Global, payload.into_inner()).await
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
