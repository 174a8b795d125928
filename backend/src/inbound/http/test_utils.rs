//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use super::configure_api;
use super::session::USER_ID_KEY;
use super::state::HttpState;
use crate::domain::{Error, UserId};

pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and non-secure cookies.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the authentication service: stores the path user id.
async fn test_login(session: Session, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session
        .insert(USER_ID_KEY, user_id.as_ref())
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with session middleware and the test login route.
pub fn session_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .route("/test/login/{user_id}", web::post().to(test_login))
}

/// Full chat API under `/api/v1` backed by `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    session_app()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Log `user_id` in and return the session cookie.
pub async fn login_cookie<S>(app: &S, user_id: &UserId) -> Cookie<'static>
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
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}
