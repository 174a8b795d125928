//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use roomchat::outbound::memory::InMemoryChatStore;
use roomchat::outbound::persistence::DbPool;

/// Where chat state lives.
#[derive(Clone)]
pub enum Storage {
    /// Process-local store; state is lost on restart.
    Memory(Arc<InMemoryChatStore>),
    /// PostgreSQL through the Diesel adapters.
    Postgres(DbPool),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
}

impl ServerConfig {
    /// Construct a server configuration backed by an empty in-memory store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage: Storage::Memory(Arc::new(InMemoryChatStore::default())),
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }
}
