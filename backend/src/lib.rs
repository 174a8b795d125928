//! Room-scoped chat service core.
//!
//! Hexagonal layout: [`domain`] holds entities, authorization rules, and the
//! room and messaging services; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] provides PostgreSQL and in-memory storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
