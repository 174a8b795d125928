//! Tests for member administration handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    AdministerMemberResponse, FixtureMessageCommand, FixtureMessageQuery, FixtureRoomCommand,
    FixtureRoomQuery, MockRoomCommand,
};
use crate::domain::{Denial, Error, Role, RoomId};
use crate::inbound::http::test_utils::{api_app, login_cookie};

fn state_with_rooms(rooms: MockRoomCommand) -> HttpState {
    HttpState::new(
        Arc::new(rooms),
        Arc::new(FixtureRoomQuery),
        Arc::new(FixtureMessageCommand),
        Arc::new(FixtureMessageQuery),
    )
}

fn member_uri(room_id: RoomId, user_id: &UserId) -> String {
    format!("/api/v1/rooms/{room_id}/members/{user_id}")
}

#[rstest]
#[case("kick", MemberAction::Kick, "User kicked from room")]
#[case("mute", MemberAction::Mute, "User muted")]
#[case("unmute", MemberAction::Unmute, "User unmuted")]
#[actix_web::test]
async fn actions_reach_the_room_service(
    #[case] raw: &str,
    #[case] expected: MemberAction,
    #[case] confirmation: &str,
) {
    let target = UserId::random();
    let room_id = RoomId::random();
    let expected_target = target.clone();
    let mut rooms = MockRoomCommand::new();
    rooms
        .expect_administer_member()
        .withf(move |request| {
            request.action == expected
                && request.target_id == expected_target
                && request.room_id == room_id
        })
        .times(1)
        .returning(|request| {
            Ok(AdministerMemberResponse {
                message: request.action.confirmation().to_owned(),
            })
        });
    let app = actix_test::init_service(api_app(state_with_rooms(rooms))).await;
    let cookie = login_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&member_uri(room_id, &target))
            .cookie(cookie)
            .set_json(json!({"action": raw}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], confirmation);
}

#[rstest]
#[actix_web::test]
async fn unknown_action_is_rejected_before_the_service() {
    let mut rooms = MockRoomCommand::new();
    rooms.expect_administer_member().times(0);
    let app = actix_test::init_service(api_app(state_with_rooms(rooms))).await;
    let cookie = login_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&member_uri(RoomId::random(), &UserId::random()))
            .cookie(cookie)
            .set_json(json!({"action": "ban"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Invalid action");
}

#[rstest]
#[case::bad_action(actix_test::TestRequest::post(), json!({"action": "ban"}))]
#[case::bad_role(actix_test::TestRequest::put(), json!({"role": "owner"}))]
#[case::valid_action(actix_test::TestRequest::post(), json!({"action": "kick"}))]
#[actix_web::test]
async fn callers_without_a_session_are_unauthorised_whatever_the_body(
    #[case] request: actix_test::TestRequest,
    #[case] body: Value,
) {
    let mut rooms = MockRoomCommand::new();
    rooms.expect_administer_member().times(0);
    let app = actix_test::init_service(api_app(state_with_rooms(rooms))).await;

    let response = actix_test::call_service(
        &app,
        request
            .uri(&member_uri(RoomId::random(), &UserId::random()))
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn set_role_maps_role_names() {
    let mut rooms = MockRoomCommand::new();
    rooms
        .expect_administer_member()
        .withf(|request| request.action == MemberAction::SetRole(Role::Moderator))
        .times(1)
        .returning(|_| {
            Ok(AdministerMemberResponse {
                message: "User role updated".to_owned(),
            })
        });
    let app = actix_test::init_service(api_app(state_with_rooms(rooms))).await;
    let cookie = login_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&member_uri(RoomId::random(), &UserId::random()))
            .cookie(cookie)
            .set_json(json!({"role": "moderator"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(Error::from(Denial::InsufficientRole), StatusCode::FORBIDDEN, "insufficient_role")]
#[case(Error::from(Denial::RoleNotAssignable), StatusCode::BAD_REQUEST, "invalid_role")]
#[case(
    Error::conflict("A room must keep at least one administrator")
        .with_details(json!({"code": "last_administrator"})),
    StatusCode::CONFLICT,
    "last_administrator"
)]
#[actix_web::test]
async fn service_failures_keep_their_status_and_reason(
    #[case] failure: Error,
    #[case] status: StatusCode,
    #[case] reason: &str,
) {
    let mut rooms = MockRoomCommand::new();
    rooms
        .expect_administer_member()
        .times(1)
        .return_once(move |_| Err(failure));
    let app = actix_test::init_service(api_app(state_with_rooms(rooms))).await;
    let cookie = login_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&member_uri(RoomId::random(), &UserId::random()))
            .cookie(cookie)
            .set_json(json!({"role": "administrator"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), status);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], reason);
}

#[rstest]
#[actix_web::test]
async fn list_members_returns_empty_fixture_listing() {
    let state = HttpState::new(
        Arc::new(FixtureRoomCommand),
        Arc::new(FixtureRoomQuery),
        Arc::new(FixtureMessageCommand),
        Arc::new(FixtureMessageQuery),
    );
    let app = actix_test::init_service(api_app(state)).await;
    let cookie = login_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/rooms/{}/members", RoomId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!([]));
}
