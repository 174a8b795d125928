//! Room member administration handlers.
//!
//! ```text
//! GET  /api/v1/rooms/{room_id}/members
//! POST /api/v1/rooms/{room_id}/members/{user_id}   {"action": "kick" | "mute" | "unmute"}
//! PUT  /api/v1/rooms/{room_id}/members/{user_id}   {"role": "user" | "moderator"}
//! ```
//!
//! Callers without a session get `401` whatever they send. Signed-in callers
//! have their body parsed before the room service runs, so a malformed
//! action or role is reported as `400` even when they lack the rights to
//! perform it.

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AdministerMemberRequest, ListMembersRequest};
use crate::domain::{ApiResult, MemberAction, MemberProfile, RoomId, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_member_action, parse_role, parse_room_id, parse_user_id,
};

/// Moderation action payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberActionRequestBody {
    #[schema(example = "mute")]
    pub action: String,
}

/// Role change payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequestBody {
    #[schema(example = "moderator")]
    pub role: String,
}

/// Confirmation returned after an administrative action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfirmationBody {
    #[schema(example = "User muted")]
    pub message: String,
}

/// Member listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "moderator")]
    pub role: String,
    pub is_muted: bool,
    #[schema(format = "date-time")]
    pub joined_at: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_ref: Option<String>,
    pub is_verified_owner: bool,
}

impl From<MemberProfile> for MemberBody {
    fn from(value: MemberProfile) -> Self {
        let MemberProfile {
            membership,
            profile,
        } = value;
        Self {
            user_id: membership.user_id.to_string(),
            role: membership.role.as_str().to_owned(),
            is_muted: membership.is_muted,
            joined_at: membership.joined_at.to_rfc3339(),
            display_name: profile.display_name.into(),
            email: profile.email,
            avatar_ref: profile.avatar_ref,
            is_verified_owner: profile.is_verified_owner,
        }
    }
}

fn parse_member_path(path: web::Path<(String, String)>) -> ApiResult<(RoomId, UserId)> {
    let (room_id, user_id) = path.into_inner();
    Ok((
        parse_room_id(&room_id)?,
        parse_user_id(&user_id, FieldName::new("userId"))?,
    ))
}

async fn administer(
    state: &HttpState,
    actor_id: UserId,
    path: web::Path<(String, String)>,
    action: MemberAction,
) -> ApiResult<web::Json<ActionConfirmationBody>> {
    let (room_id, target_id) = parse_member_path(path)?;
    let response = state
        .rooms
        .administer_member(AdministerMemberRequest {
            actor_id,
            room_id,
            target_id,
            action,
        })
        .await?;
    Ok(web::Json(ActionConfirmationBody {
        message: response.message,
    }))
}

/// List a room's members, most recent joiners first. Requires moderator or
/// administrator role in the room.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/members",
    params(("room_id" = String, Path, description = "Room identifier", format = "uuid")),
    responses(
        (status = 200, description = "Members", body = [MemberBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Insufficient permissions", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "listMembers",
    security(("SessionCookie" = []))
)]
#[get("/rooms/{room_id}/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MemberBody>>> {
    let actor_id = session.require_user_id()?;
    let room_id = parse_room_id(&path.into_inner())?;
    let response = state
        .room_queries
        .list_members(ListMembersRequest { actor_id, room_id })
        .await?;
    Ok(web::Json(
        response.members.into_iter().map(MemberBody::from).collect(),
    ))
}

/// Kick, mute, or unmute a member.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{room_id}/members/{user_id}",
    params(
        ("room_id" = String, Path, description = "Room identifier", format = "uuid"),
        ("user_id" = String, Path, description = "Target member", format = "uuid")
    ),
    request_body = MemberActionRequestBody,
    responses(
        (status = 200, description = "Action applied", body = ActionConfirmationBody),
        (status = 400, description = "Invalid action", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Insufficient permissions", body = ErrorSchema),
        (status = 404, description = "Target is not a member", body = ErrorSchema),
        (status = 409, description = "Would remove the last administrator", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "administerMember",
    security(("SessionCookie" = []))
)]
#[post("/rooms/{room_id}/members/{user_id}")]
pub async fn administer_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<MemberActionRequestBody>,
) -> ApiResult<web::Json<ActionConfirmationBody>> {
    let actor_id = session.require_user_id()?;
    let action = parse_member_action(&payload.action)?;
    administer(&state, actor_id, path, action).await
}

/// Change a member's role. Administrators cannot be appointed here.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{room_id}/members/{user_id}",
    params(
        ("room_id" = String, Path, description = "Room identifier", format = "uuid"),
        ("user_id" = String, Path, description = "Target member", format = "uuid")
    ),
    request_body = SetRoleRequestBody,
    responses(
        (status = 200, description = "Role updated", body = ActionConfirmationBody),
        (status = 400, description = "Invalid role", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Insufficient permissions", body = ErrorSchema),
        (status = 404, description = "Target is not a member", body = ErrorSchema),
        (status = 409, description = "Would demote the last administrator", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "setMemberRole",
    security(("SessionCookie" = []))
)]
#[put("/rooms/{room_id}/members/{user_id}")]
pub async fn set_member_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<SetRoleRequestBody>,
) -> ApiResult<web::Json<ActionConfirmationBody>> {
    let actor_id = session.require_user_id()?;
    let role = parse_role(&payload.role)?;
    administer(&state, actor_id, path, MemberAction::SetRole(role)).await
}

#[cfg(test)]
#[path = "members_tests.rs"]
mod tests;
