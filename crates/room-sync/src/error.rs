//! Error types for the sync client.

use thiserror::Error;

/// Failure of a single poll.
///
/// Every variant is transient from the poller's point of view: the view is
/// left as it was and the next tick tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the underlying client error.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server responded {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason code from the error body's `details.code`, when present.
        reason: Option<String>,
        /// Server-provided message.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// A request URL could not be built from the base URL.
    #[error("invalid server URL: {message}")]
    InvalidUrl {
        /// Description of the URL error.
        message: String,
    },
}

impl SyncError {
    /// Whether the session is missing or no longer accepted.
    ///
    /// Pollers keep retrying regardless; callers use this to prompt a new
    /// login.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                message: error.to_string(),
            }
        }
    }
}
