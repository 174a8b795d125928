//! Session access for chat handlers.
//!
//! The authentication service writes the `user_id` key into the encrypted
//! session cookie; handlers here only read it back.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

/// Session key under which the authentication service stores the user id.
pub const USER_ID_KEY: &str = "user_id";

/// Handler-facing wrapper around the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// User id stored in the session. Tampered values count as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match UserId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "ignoring malformed user id in session cookie");
                None
            }
        }))
    }

    /// Require a session user or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{SESSION_COOKIE, session_app};

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    #[rstest]
    #[actix_web::test]
    async fn stored_user_id_is_read_back() {
        let app = test::init_service(session_app().route("/whoami", web::get().to(whoami))).await;
        let user = UserId::random();
        let cookie = crate::inbound::http::test_utils::login_cookie(&app, &user).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, user.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let app = test::init_service(session_app().route("/whoami", web::get().to(whoami))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_user_id_is_unauthorised() {
        let app = test::init_service(
            session_app()
                .route(
                    "/tamper",
                    web::get().to(|session: Session| async move {
                        match session.insert(USER_ID_KEY, "not-a-uuid") {
                            Ok(()) => HttpResponse::Ok().finish(),
                            Err(_) => HttpResponse::InternalServerError().finish(),
                        }
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let tampered =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = tampered
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
