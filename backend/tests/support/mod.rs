//! Shared helpers for the embedded PostgreSQL suites.
//!
//! Each suite gets its own cluster from [`pg_embed::test_cluster`] and a
//! freshly created database migrated with the server's own embedded
//! migrations.

pub mod cluster_skip;
pub mod pg_embed;

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

pub use cluster_skip::handle_cluster_setup_failure;
pub use pg_embed::test_cluster;

/// Render a `postgres` error with its SQLSTATE and detail when available.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Create an empty database with a unique name and return its URL.
pub fn fresh_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("chat_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(cluster.connection().database_url(&name))
}

/// Insert a profile the way the authentication service would.
pub fn seed_user(url: &str, id: Uuid, display_name: &str, is_admin: bool) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO users (id, display_name, is_admin) VALUES ($1, $2, $3)",
            &[&id, &display_name, &is_admin],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}
