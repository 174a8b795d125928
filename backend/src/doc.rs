//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every chat endpoint, the health checks, the adapter
//! schema wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]), and the session
//! cookie security scheme.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::members::{
    ActionConfirmationBody, MemberActionRequestBody, MemberBody, SetRoleRequestBody,
};
use crate::inbound::http::messages::{
    MessageBody, MessageViewBody, PostMessageRequestBody, PostedMessageBody,
};
use crate::inbound::http::rooms::{CreateRoomRequestBody, MembershipBody, RoomBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the chat REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Room chat API",
        description = "Rooms, memberships, moderation, and message history for signed-in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::rooms::list_rooms,
        crate::inbound::http::rooms::create_room,
        crate::inbound::http::rooms::join_room,
        crate::inbound::http::members::list_members,
        crate::inbound::http::members::administer_member,
        crate::inbound::http::members::set_member_role,
        crate::inbound::http::messages::list_room_messages,
        crate::inbound::http::messages::post_room_message,
        crate::inbound::http::messages::list_global_messages,
        crate::inbound::http::messages::post_global_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateRoomRequestBody,
        RoomBody,
        MembershipBody,
        MemberBody,
        MemberActionRequestBody,
        SetRoleRequestBody,
        ActionConfirmationBody,
        PostMessageRequestBody,
        MessageBody,
        PostedMessageBody,
        MessageViewBody,
    )),
    tags(
        (name = "rooms", description = "Room listing, creation, and joining"),
        (name = "members", description = "Member listing and moderation"),
        (name = "messages", description = "Room and global message history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
