//! Error types for the rentals API client.
//!
//! # Design
//! Every failed call surfaces as one `ApiError` carrying the three things a
//! caller needs: a human-readable message, the HTTP status (0 when no
//! response arrived) and the raw response body when there was one. The
//! variants keep the failure taxonomy distinguishable without forcing
//! callers to match on them.

use serde_json::Value;
use thiserror::Error;

/// Shown when the transport fails without a usable message.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Shown when a response carries neither usable data nor an error message.
pub const REQUEST_FAILED_MESSAGE: &str = "API request failed";

/// Errors returned by `ApiClient`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response reached the client.
    #[error("{message}")]
    Transport { message: String },

    /// The response envelope carried an `error` object.
    #[error("{message}")]
    Envelope {
        message: String,
        status: u16,
        data: Value,
        /// A 401 that arrived away from the login section; session
        /// recovery was already started for it.
        session_expired: bool,
    },

    /// The response had neither usable `data` nor an `error` object.
    #[error("{message}")]
    Malformed {
        message: String,
        status: u16,
        data: Value,
        /// A 401 that arrived away from the login section; session
        /// recovery was already started for it.
        session_expired: bool,
    },

    /// The envelope's `data` did not match the expected type.
    #[error("response data could not be decoded: {message}")]
    Decode {
        message: String,
        status: u16,
        data: Value,
    },

    /// The request body could not be encoded.
    #[error("request body could not be encoded: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message }
            | ApiError::Envelope { message, .. }
            | ApiError::Malformed { message, .. }
            | ApiError::Decode { message, .. } => message,
            ApiError::Encode(message) => message,
        }
    }

    /// HTTP status of the failed response, 0 if none was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Transport { .. } | ApiError::Encode(_) => 0,
            ApiError::Envelope { status, .. }
            | ApiError::Malformed { status, .. }
            | ApiError::Decode { status, .. } => *status,
        }
    }

    /// Raw response body, when a response was received.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Transport { .. } | ApiError::Encode(_) => None,
            ApiError::Envelope { data, .. }
            | ApiError::Malformed { data, .. }
            | ApiError::Decode { data, .. } => Some(data),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// Whether this failure ended the session. Decided once, when the 401
    /// arrives, so later navigation cannot change the answer.
    pub fn session_expired(&self) -> bool {
        matches!(
            self,
            ApiError::Envelope {
                session_expired: true,
                ..
            } | ApiError::Malformed {
                session_expired: true,
                ..
            }
        )
    }

    pub(crate) fn into_session_expired(mut self) -> Self {
        if let ApiError::Envelope { session_expired, .. } | ApiError::Malformed { session_expired, .. } =
            &mut self
        {
            *session_expired = true;
        }
        self
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        let message = if error.message.trim().is_empty() {
            NETWORK_ERROR_MESSAGE.to_string()
        } else {
            error.message
        };
        ApiError::Transport { message }
    }
}

/// A request that never produced a response.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures of client-side storage and state stores.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage lock poisoned: {0}")]
    Poisoned(&'static str),

    #[error("storage failed for key {key}: {message}")]
    Storage { key: String, message: String },
}

/// Invalid client configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: must start with http:// or https://")]
    InvalidBaseUrl { url: String },

    #[error("invalid login path {path:?}: must start with '/'")]
    InvalidLoginPath { path: String },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn transport_errors_have_status_zero_and_no_data() {
        let err = ApiError::from(TransportError::new("connection refused"));
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.status(), 0);
        assert!(err.data().is_none());
    }

    #[test]
    fn blank_transport_message_falls_back_to_network_error() {
        let err = ApiError::from(TransportError::new("  "));
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn envelope_error_exposes_status_and_raw_body() {
        let body = json!({"success": false, "error": {"message": "Invalid credentials"}});
        let err = ApiError::Envelope {
            message: "Invalid credentials".to_string(),
            status: 401,
            data: body.clone(),
            session_expired: false,
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), 401);
        assert_eq!(err.data(), Some(&body));
        assert!(err.is_unauthorized());
        assert!(!err.session_expired());
        assert!(err.into_session_expired().session_expired());
    }

    #[test]
    fn only_responses_can_end_a_session() {
        let err = ApiError::from(TransportError::new("down")).into_session_expired();
        assert!(!err.session_expired());
    }
}
