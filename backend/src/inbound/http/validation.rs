//! Request parsing helpers shared by the chat handlers.
//!
//! Failures become `invalid_request` errors carrying `field` and `code`
//! details so clients can highlight the offending input.

use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, MemberAction, Role, RoomId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    InvalidUuid,
    InvalidAction,
    InvalidRole,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidAction => "invalid_action",
            ErrorCode::InvalidRole => "invalid_role",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "value": value,
        "code": code.as_str(),
    }))
}

fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.0),
            value,
        )
    })
}

pub(crate) fn parse_room_id(value: &str) -> Result<RoomId, Error> {
    parse_uuid(value, FieldName::new("roomId")).map(RoomId::from_uuid)
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

/// Parse `kick`, `mute`, or `unmute`.
pub(crate) fn parse_member_action(value: &str) -> Result<MemberAction, Error> {
    match value {
        "kick" => Ok(MemberAction::Kick),
        "mute" => Ok(MemberAction::Mute),
        "unmute" => Ok(MemberAction::Unmute),
        other => Err(field_error(
            FieldName::new("action"),
            ErrorCode::InvalidAction,
            "Invalid action".to_owned(),
            other,
        )),
    }
}

/// Parse a role name. Whether the role may be assigned is decided by the
/// room service.
pub(crate) fn parse_role(value: &str) -> Result<Role, Error> {
    Role::from_str(value).map_err(|_| {
        field_error(
            FieldName::new("role"),
            ErrorCode::InvalidRole,
            "Invalid role".to_owned(),
            value,
        )
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("kick", MemberAction::Kick)]
    #[case("mute", MemberAction::Mute)]
    #[case("unmute", MemberAction::Unmute)]
    fn known_actions_parse(#[case] raw: &str, #[case] expected: MemberAction) {
        assert_eq!(parse_member_action(raw).expect("known action"), expected);
    }

    #[rstest]
    #[case("ban")]
    #[case("Kick")]
    #[case("set_role")]
    fn unknown_actions_are_invalid(#[case] raw: &str) {
        let error = parse_member_action(raw).expect_err("unknown action");
        assert_eq!(error.message(), "Invalid action");
        assert_eq!(error.reason(), Some("invalid_action"));
    }

    #[rstest]
    fn administrator_parses_so_the_service_can_refuse_it() {
        assert_eq!(
            parse_role("administrator").expect("role parses"),
            Role::Administrator
        );
        assert_eq!(
            parse_role("owner").expect_err("unknown role").reason(),
            Some("invalid_role")
        );
    }

    #[rstest]
    fn malformed_ids_name_the_field() {
        let error = parse_user_id("nope", FieldName::new("userId")).expect_err("bad uuid");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "userId");
        assert_eq!(details["code"], "invalid_uuid");
        assert!(parse_room_id("0b1c2d3e-0000-4000-8000-000000000001").is_ok());
    }
}
