//! End-to-end HTTP flow over the in-memory store.
//!
//! A stand-in login route plays the authentication service by writing the
//! user id into the shared session cookie.

use std::sync::Arc;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use roomchat::Trace;
use roomchat::domain::{
    DisplayName, Error, MessagingService, RoomService, TRACE_ID_HEADER, UserId, UserProfile,
};
use roomchat::inbound::http::configure_api;
use roomchat::inbound::http::session::USER_ID_KEY;
use roomchat::inbound::http::state::HttpState;
use roomchat::outbound::memory::InMemoryChatStore;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

async fn stand_in_login(
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user_id =
        UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session
        .insert(USER_ID_KEY, user_id.as_ref())
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::NoContent().finish())
}

struct Users {
    admin: UserId,
    member: UserId,
}

#[fixture]
fn store() -> Arc<InMemoryChatStore> {
    Arc::new(InMemoryChatStore::default())
}

async fn seed(store: &InMemoryChatStore) -> Users {
    let admin = UserProfile::new(UserId::random(), DisplayName::new("Ada").expect("name")).as_admin();
    let member = UserProfile::new(UserId::random(), DisplayName::new("Bea").expect("name"));
    let users = Users {
        admin: admin.id.clone(),
        member: member.id.clone(),
    };
    store.insert_user(admin).await;
    store.insert_user(member).await;
    users
}

fn state_over(store: Arc<InMemoryChatStore>) -> HttpState {
    let rooms = Arc::new(RoomService::new(store.clone(), store.clone(), store.clone()));
    let messaging = Arc::new(MessagingService::new(store.clone(), store.clone(), store));
    HttpState::new(rooms.clone(), rooms, messaging.clone(), messaging)
}

async fn login<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[rstest]
#[actix_web::test]
async fn room_is_created_joined_moderated_and_read(store: Arc<InMemoryChatStore>) {
    let users = seed(&store).await;
    let app = test::init_service(
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Trace)
            .app_data(web::Data::new(state_over(store)))
            .route("/test/login/{user_id}", web::post().to(stand_in_login))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;
    let admin = login(&app, &users.admin).await;
    let member = login(&app, &users.member).await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/rooms")
            .cookie(admin.clone())
            .set_json(json!({"name": "  lobby  "}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let room: Value = test::read_body_json(created).await;
    assert_eq!(room["name"], "lobby");
    assert_eq!(room["memberCount"], 1);
    let room_id = room["id"].as_str().expect("room id").to_owned();

    let joined = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rooms/{room_id}/join"))
            .cookie(member.clone())
            .to_request(),
    )
    .await;
    assert_eq!(joined.status(), StatusCode::OK);

    let posted = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rooms/{room_id}/messages"))
            .cookie(member.clone())
            .set_json(json!({"content": "hi all"}))
            .to_request(),
    )
    .await;
    assert_eq!(posted.status(), StatusCode::CREATED);

    let muted = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rooms/{room_id}/members/{}", users.member))
            .cookie(admin.clone())
            .set_json(json!({"action": "mute"}))
            .to_request(),
    )
    .await;
    assert_eq!(muted.status(), StatusCode::OK);

    let refused = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/rooms/{room_id}/messages"))
            .cookie(member.clone())
            .set_json(json!({"content": "still here?"}))
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let trace_header = refused
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = test::read_body_json(refused).await;
    assert_eq!(body["details"]["code"], "muted");
    assert_eq!(body["traceId"].as_str().map(str::to_owned), trace_header);

    let history = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/rooms/{room_id}/messages"))
            .cookie(member)
            .to_request(),
    )
    .await;
    assert_eq!(history.status(), StatusCode::OK);
    let messages: Value = test::read_body_json(history).await;
    assert_eq!(messages.as_array().map(Vec::len), Some(1));
    assert_eq!(messages[0]["senderName"], "Bea");

    let members = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/rooms/{room_id}/members"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    let members: Value = test::read_body_json(members).await;
    assert_eq!(members[0]["userId"], users.member.to_string());
    assert_eq!(members[0]["isMuted"], true);
    assert_eq!(members[1]["role"], "administrator");
}
