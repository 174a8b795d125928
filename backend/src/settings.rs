//! Server settings loaded via OrthoConfig from CLI flags, `ROOMCHAT_*`
//! environment variables, and configuration files.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// `db_max_connections` must be at least one.
    #[error("db_max_connections must be at least 1")]
    EmptyPool,
}

/// Settings for the chat server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROOMCHAT")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations at startup. Unset means yes.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Configured pool size, defaulting to 10.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyPool`] when configured as zero.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// Whether startup applies pending migrations; defaults to `true`.
    #[must_use]
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Database URL with surrounding whitespace removed; blank counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
