//! HTTP server assembly: session cookie, tracing and the chat routes.

mod config;
mod state_builders;

pub use config::{ServerConfig, Storage};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use roomchat::Trace;
#[cfg(debug_assertions)]
use roomchat::doc::ApiDoc;
use roomchat::inbound::http::configure_api;
use roomchat::inbound::http::health::{HealthState, live, ready};
use roomchat::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie attributes a worker needs to read sessions issued at login.
#[derive(Clone)]
struct CookiePolicy {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

/// Per-worker shared state.
#[derive(Clone)]
struct Shared {
    health: web::Data<HealthState>,
    chat: web::Data<HttpState>,
    cookies: CookiePolicy,
}

// Must stay in step with the authentication service that writes the cookie.
fn session_middleware(policy: CookiePolicy) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), policy.key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(policy.secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(policy.same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

fn chat_app(
    shared: Shared,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let Shared {
        health,
        chat,
        cookies,
    } = shared;

    let app = App::new()
        .app_data(health)
        .app_data(chat)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session_middleware(cookies))
                .configure(configure_api),
        )
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the chat server and mark it ready.
///
/// Chat state is shared by every worker: one in-memory store or one
/// PostgreSQL pool, per [`ServerConfig`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let chat = build_http_state(&config.storage);
    let cookies = CookiePolicy {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let health = health_state.clone();

    let server = HttpServer::new(move || {
        chat_app(Shared {
            health: health.clone(),
            chat: chat.clone(),
            cookies: cookies.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
