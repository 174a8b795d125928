//! Port for reading user profiles owned by the authentication service.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Read-only access to user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up one profile.
    async fn find_profile(&self, user_id: &UserId)
    -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Look up many profiles at once. Unknown ids are skipped.
    async fn find_profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserDirectoryError>;
}

/// Fixture directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_profile(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(None)
    }

    async fn find_profiles(
        &self,
        _user_ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserDirectoryError> {
        Ok(Vec::new())
    }
}
