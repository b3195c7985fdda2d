//! Unified error handling for the storefront client.
//!
//! The HTTP wrapper and the services all return `Result<T, ClientError>`.
//! Nothing below the view layer recovers from an error; it is logged where it
//! happens and propagated with `?`.

use thiserror::Error;

use crate::session::StoreError;

/// Fallback used when a failed response carries no usable `message`.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Error type for API calls and the services built on them.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    ///
    /// Displays as the bare server message so it can be shown to users as-is.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing the persisted session failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),

    /// The request could not be built, e.g. a malformed endpoint path.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses, i.e. the stored token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// True for 404 responses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
