//! Error types for the CinemaGuide client.
//!
//! This module defines the centralized error type [`CinemaError`] and a type alias
//! [`Result`] used throughout the crate. Errors are implemented with `thiserror`;
//! transport, I/O and JSON failures convert automatically via `#[from]`.
//!
//! Only authentication failures raised by an explicit login or registration are
//! meant to reach the user. Background work (profile lookups, search, favorites
//! reads) logs its failures and degrades instead of returning them.

use thiserror::Error;

/// The main error type for CinemaGuide client operations.
///
/// # Examples
///
/// ```
/// use cinemaguide::CinemaError;
///
/// let err = CinemaError::Auth("Неверный пароль".to_string());
/// assert_eq!(err.to_string(), "Неверный пароль");
/// assert!(err.is_auth());
/// ```
#[derive(Debug, Error)]
pub enum CinemaError {
    /// Login or registration was rejected.
    ///
    /// Displays exactly the user-facing message, which is taken from the remote
    /// error payload when one is present.
    #[error("{0}")]
    Auth(String),

    /// A movie lookup by id found nothing.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// The remote service answered with a non-success status.
    ///
    /// `message` carries the `error` field of the response body, if any.
    #[error("Remote service returned status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the `{"error": "..."}` payload.
        message: Option<String>,
    },

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading from or writing to the durable key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CinemaError {
    /// Returns `true` for [`CinemaError::Auth`].
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns `true` for [`CinemaError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Message supplied by the remote service for this error, if any.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Auth(message) => Some(message),
            _ => None,
        }
    }
}

/// A specialized `Result` type for CinemaGuide operations.
pub type Result<T> = std::result::Result<T, CinemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_message_prefers_payload() {
        let err = CinemaError::Api {
            status: 400,
            message: Some("Неверный пароль".to_string()),
        };
        assert_eq!(err.remote_message(), Some("Неверный пароль"));
        assert_eq!(err.to_string(), "Remote service returned status 400");

        let bare = CinemaError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(bare.remote_message(), None);
    }

    #[test]
    fn not_found_is_classified() {
        let err = CinemaError::NotFound("42".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_auth());
        assert_eq!(err.to_string(), "Movie not found: 42");
    }
}
