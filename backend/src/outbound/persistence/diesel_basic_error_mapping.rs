//! Shared Diesel error mapping for the chat repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// The raw database message is only logged; the returned error carries a
/// fixed description.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::BrokenTransactionManager => connection("database transaction state lost"),
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            query("concurrent update conflict")
        }
        _ => query("database error"),
    }
}

/// Whether the error is a foreign key violation, optionally on a named
/// constraint.
pub(crate) fn is_foreign_key_violation(error: &DieselError, constraint: Option<&str>) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            match (constraint, info.constraint_name()) {
                (Some(expected), Some(actual)) => expected == actual,
                _ => true,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(map(DieselError::NotFound), Mapped::Query("record not found"));
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert_eq!(map(error), Mapped::Connection("database connection error"));
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }

    #[rstest]
    fn foreign_key_violations_are_detected() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("insert violates foreign key".to_owned()),
        );
        assert!(is_foreign_key_violation(&error, None));
        assert!(!is_foreign_key_violation(&DieselError::NotFound, None));
    }
}
