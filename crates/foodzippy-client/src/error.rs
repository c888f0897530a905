//! Error types for the HTTP client and workflows

use std::io;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be built or its body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Backend unreachable: connect failure, timeout or dropped connection
    #[error("Cannot reach the server: {message}")]
    Network {
        /// Transport error message
        message: String,
    },

    /// Backend answered with a non-success status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server message, or `Request failed`
        message: String,
    },

    /// Token missing, expired or lacking permission
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Server message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input rejected before any request was sent
    #[error("{message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Operation needs a signed-in administrator
    #[error("Not signed in, run `foodzippy-admin auth login` first")]
    NotAuthenticated,

    /// Session storage failure
    #[error("Session storage error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Error raised by the core layer
    #[error(transparent)]
    Core(foodzippy_core::Error),
}

impl ClientError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a session storage error
    pub fn session(message: impl std::fmt::Display) -> Self {
        Self::Session {
            message: message.to_string(),
        }
    }

    /// Whether the backend could not be reached at all
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether the token was rejected
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message suitable for showing to an operator
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(err) => err.user_message(),
            Self::Unauthorized { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::network(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

impl From<foodzippy_core::Error> for ClientError {
    fn from(err: foodzippy_core::Error) -> Self {
        match err {
            foodzippy_core::Error::Validation { message, .. } => Self::Validation { message },
            other => Self::Core(other),
        }
    }
}

// Conversions to core error types
impl From<ClientError> for foodzippy_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network { message } => Self::Network(message),
            ClientError::Api { status, message } => Self::Api { status, message },
            ClientError::Unauthorized { message } => Self::Authentication(message),
            ClientError::NotAuthenticated => Self::Authentication("Not signed in".to_string()),
            ClientError::Validation { message } => Self::validation("request", message),
            ClientError::Json(e) => Self::Serialization(e),
            ClientError::Io(e) => Self::Io(e),
            ClientError::Core(e) => e,
            other => Self::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_network_errors_are_network() {
        assert!(ClientError::network("connection refused").is_network());
        assert!(!ClientError::api(500, "boom").is_network());
        assert!(!ClientError::unauthorized("expired").is_network());
    }

    #[test]
    fn test_api_error_shows_server_message() {
        assert_eq!(
            ClientError::api(409, "Username already exists").to_string(),
            "Username already exists"
        );
    }

    #[test]
    fn test_core_validation_flattens() {
        let err = ClientError::from(foodzippy_core::Error::validation(
            "category",
            "Please select both category and visit status",
        ));
        assert!(matches!(err, ClientError::Validation { .. }));
        assert_eq!(err.user_message(), "Please select both category and visit status");
    }

    #[test]
    fn test_conversion_to_core() {
        let core: foodzippy_core::Error = ClientError::unauthorized("Token expired").into();
        assert!(matches!(core, foodzippy_core::Error::Authentication(_)));

        let core: foodzippy_core::Error = ClientError::api(404, "Vendor not found").into();
        assert_eq!(core.to_string(), "API error (404): Vendor not found");
    }
}
