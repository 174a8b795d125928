//! HTTP inbound adapter exposing the chat REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod members;
pub mod messages;
pub mod rooms;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod validation;

pub use crate::domain::ApiResult;

/// Register every chat endpoint. Mount under `/api/v1` behind the session
/// middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(rooms::list_rooms)
        .service(rooms::create_room)
        .service(rooms::join_room)
        .service(members::list_members)
        .service(members::administer_member)
        .service(members::set_member_role)
        .service(messages::list_room_messages)
        .service(messages::post_room_message)
        .service(messages::list_global_messages)
        .service(messages::post_global_message);
}
