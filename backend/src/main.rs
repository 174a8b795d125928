//! Chat server entry-point: loads settings, selects storage, and serves the
//! REST API with OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roomchat::inbound::http::health::HealthState;
use roomchat::inbound::http::session_config::fingerprint::key_fingerprint;
use roomchat::inbound::http::session_config::{BuildMode, session_settings_from_env};
use roomchat::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use roomchat::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );

    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations() {
                let applied = run_migrations(url).await?;
                info!(applied, "database migrations applied");
            }
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()?),
            )
            .await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; chat state is kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting chat server");
    create_server(health_state, config)?.await?;
    Ok(())
}
