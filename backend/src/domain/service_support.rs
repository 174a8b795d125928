//! Shared helpers for the room and messaging services: resolving the caller
//! and translating port failures into domain errors.

use std::fmt::Display;

use serde_json::json;

use super::Denial;
use crate::domain::ports::{
    MembershipRepositoryError, MessageRepositoryError, RoomRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{Error, UserId, UserProfile};

/// Load the caller's profile. A session naming an unknown user is treated
/// exactly like a missing session.
pub(super) async fn resolve_actor<D>(directory: &D, user_id: &UserId) -> Result<UserProfile, Error>
where
    D: UserDirectory + ?Sized,
{
    directory
        .find_profile(user_id)
        .await
        .map_err(map_directory_error("resolve_actor"))?
        .ok_or_else(|| {
            tracing::debug!(%user_id, "session names an unknown user");
            Error::unauthorized("login required")
        })
}

/// Convert an authorization denial, logging it as an expected outcome.
pub(super) fn denied(operation: &'static str, actor: &UserId) -> impl FnOnce(Denial) -> Error {
    let actor = actor.clone();
    move |denial| {
        tracing::debug!(operation, %actor, reason = denial.code(), "request denied");
        Error::from(denial)
    }
}

/// Invalid input with a field pointer and a machine-readable code.
pub(super) fn invalid_field(field: &str, code: &str, error: impl Display) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn storage_unavailable(operation: &'static str, error: &dyn Display) -> Error {
    tracing::error!(operation, %error, "storage unreachable");
    Error::service_unavailable("Storage temporarily unavailable")
}

fn storage_failed(operation: &'static str, error: &dyn Display) -> Error {
    tracing::error!(operation, %error, "storage operation failed");
    Error::internal("Storage failure")
}

pub(super) fn map_directory_error(
    operation: &'static str,
) -> impl FnOnce(UserDirectoryError) -> Error {
    move |error| match &error {
        UserDirectoryError::Connection { .. } => storage_unavailable(operation, &error),
        UserDirectoryError::Query { .. } => storage_failed(operation, &error),
    }
}

pub(super) fn map_room_error(operation: &'static str) -> impl FnOnce(RoomRepositoryError) -> Error {
    move |error| match &error {
        RoomRepositoryError::Connection { .. } => storage_unavailable(operation, &error),
        RoomRepositoryError::Query { .. } => storage_failed(operation, &error),
    }
}

pub(super) fn map_message_error(
    operation: &'static str,
) -> impl FnOnce(MessageRepositoryError) -> Error {
    move |error| match &error {
        MessageRepositoryError::Connection { .. } => storage_unavailable(operation, &error),
        MessageRepositoryError::Query { .. } => storage_failed(operation, &error),
    }
}

pub(super) fn map_membership_error(
    operation: &'static str,
) -> impl FnOnce(MembershipRepositoryError) -> Error {
    move |error| match &error {
        MembershipRepositoryError::Connection { .. } => storage_unavailable(operation, &error),
        MembershipRepositoryError::Query { .. } => storage_failed(operation, &error),
        MembershipRepositoryError::RoomNotFound { .. } => Error::not_found("Room not found"),
        MembershipRepositoryError::MissingMembership { .. } => {
            Error::not_found("User is not a member of this room")
        }
        MembershipRepositoryError::LastAdministrator { .. } => {
            tracing::debug!(operation, %error, "last administrator guard tripped");
            Error::conflict("A room must keep at least one administrator")
                .with_details(json!({ "code": "last_administrator" }))
        }
    }
}
