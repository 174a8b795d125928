//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the chat repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Authorization stays in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Store-side invariants**: atomic room creation and the
//!   last-administrator guard live in transactions here.
//!
//! # Example
//!
//! ```ignore
//! use roomchat::outbound::persistence::{DbPool, DieselRoomRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/chat")).await?;
//! let rooms = DieselRoomRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_membership_repository;
mod diesel_message_repository;
mod diesel_room_repository;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_room_repository::DieselRoomRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
