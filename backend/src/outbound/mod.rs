//! Driven adapters: PostgreSQL repositories and the in-memory store.

pub mod memory;
pub mod persistence;
