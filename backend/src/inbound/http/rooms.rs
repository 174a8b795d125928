//! Room HTTP handlers.
//!
//! ```text
//! GET  /api/v1/rooms
//! POST /api/v1/rooms
//! POST /api/v1/rooms/{room_id}/join
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateRoomRequest, JoinRoomRequest, ListRoomsRequest};
use crate::domain::{ApiResult, Membership, RoomSummary};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_room_id;

/// Request payload for creating a room.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequestBody {
    #[schema(example = "Rust learners")]
    pub name: String,
}

/// Room listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    #[schema(format = "uuid")]
    pub created_by: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    pub creator_name: Option<String>,
    pub creator_avatar: Option<String>,
    pub member_count: u64,
}

impl From<RoomSummary> for RoomBody {
    fn from(value: RoomSummary) -> Self {
        let RoomSummary {
            room,
            creator_name,
            creator_avatar,
            member_count,
        } = value;
        Self {
            id: room.id.to_string(),
            name: room.name.to_string(),
            created_by: room.created_by.to_string(),
            created_at: room.created_at.to_rfc3339(),
            creator_name: creator_name.map(String::from),
            creator_avatar,
            member_count,
        }
    }
}

/// A user's membership in a room.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipBody {
    #[schema(format = "uuid")]
    pub room_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "user")]
    pub role: String,
    pub is_muted: bool,
    #[schema(format = "date-time")]
    pub joined_at: String,
}

impl From<Membership> for MembershipBody {
    fn from(value: Membership) -> Self {
        Self {
            room_id: value.room_id.to_string(),
            user_id: value.user_id.to_string(),
            role: value.role.as_str().to_owned(),
            is_muted: value.is_muted,
            joined_at: value.joined_at.to_rfc3339(),
        }
    }
}

/// List every room, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses(
        (status = 200, description = "Rooms, newest first", body = [RoomBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "listRooms",
    security(("SessionCookie" = []))
)]
#[get("/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RoomBody>>> {
    let actor_id = session.require_user_id()?;
    let response = state
        .room_queries
        .list_rooms(ListRoomsRequest { actor_id })
        .await?;
    Ok(web::Json(
        response.rooms.into_iter().map(RoomBody::from).collect(),
    ))
}

/// Create a room. Only platform administrators may do so; the creator
/// becomes the room's first administrator.
///
/// # Examples
/// ```no_run
/// use actix_web::web;
/// use roomchat::domain::ApiResult;
/// use roomchat::inbound::http::rooms::{CreateRoomRequestBody, create_room};
/// use roomchat::inbound::http::session::SessionContext;
/// use roomchat::inbound::http::state::HttpState;
///
/// async fn call_handler(
///     state: web::Data<HttpState>,
///     session: SessionContext,
/// ) -> ApiResult<actix_web::HttpResponse> {
///     let payload = web::Json(CreateRoomRequestBody {
///         name: "Rust learners".to_owned(),
///     });
///     create_room(state, session, payload).await
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = CreateRoomRequestBody,
    responses(
        (status = 201, description = "Room created", body = RoomBody),
        (status = 400, description = "Invalid room name", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a platform administrator", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "createRoom",
    security(("SessionCookie" = []))
)]
#[post("/rooms")]
pub async fn create_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRoomRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    let response = state
        .rooms
        .create_room(CreateRoomRequest {
            actor_id,
            name: payload.into_inner().name,
        })
        .await?;
    Ok(HttpResponse::Created().json(RoomBody::from(response.room)))
}

/// Join a room as a plain user. Joining again returns the existing
/// membership unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/join",
    params(("room_id" = String, Path, description = "Room identifier", format = "uuid")),
    responses(
        (status = 200, description = "Membership", body = MembershipBody),
        (status = 400, description = "Invalid room id", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Room not found", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "joinRoom",
    security(("SessionCookie" = []))
)]
#[post("/rooms/{room_id}/join")]
pub async fn join_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MembershipBody>> {
    let actor_id = session.require_user_id()?;
    let room_id = parse_room_id(&path.into_inner())?;
    let response = state
        .rooms
        .join_room(JoinRoomRequest { actor_id, room_id })
        .await?;
    Ok(web::Json(MembershipBody::from(response.membership)))
}

#[cfg(test)]
#[path = "rooms_tests.rs"]
mod tests;
