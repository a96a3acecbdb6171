//! Error types for the Bugzilla client.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for Bugzilla operations.
pub type Result<T> = std::result::Result<T, BugzillaError>;

/// Errors that can occur while talking to Bugzilla.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum BugzillaError {
    /// The request could not be built (bad configuration, ambiguous target,
    /// malformed input).
    #[error("cannot build request: {0}")]
    Request(String),

    /// The bug changed on the server since the caller last read it.
    #[error(
        "cannot build request: likely mid-air collision: the bug has been updated at {last_change_time}"
    )]
    Collision {
        /// Last change time reported by the server.
        last_change_time: DateTime<Utc>,
    },

    /// An enumerated value outside of the accepted set.
    #[error("cannot build request: invalid {field} value: {value}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Value as supplied by the caller.
        value: String,
    },

    /// Bugzilla rejected the request.
    #[error("Bugzilla: {}", format_service_error(.code, .message))]
    Service {
        /// Error code from a structured error body, if there was one.
        code: Option<i64>,
        /// Message from the error body, or the HTTP status text.
        message: String,
    },

    /// Transport-level failure or a response with an unexpected shape.
    #[error("cannot communicate with server: {0}")]
    Connection(String),

    /// The response body could not be parsed.
    #[error("error decoding response: {0}")]
    Decode(String),
}

fn format_service_error(code: &Option<i64>, message: &str) -> String {
    match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    }
}

impl BugzillaError {
    /// Check if the request was refused before reaching the server.
    ///
    /// Collisions and invalid values are request errors too.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            BugzillaError::Request(_)
                | BugzillaError::Collision { .. }
                | BugzillaError::InvalidValue { .. }
        )
    }

    /// Check if this is a mid-air collision.
    pub fn is_collision(&self) -> bool {
        matches!(self, BugzillaError::Collision { .. })
    }

    /// Check if Bugzilla itself rejected the request.
    pub fn is_service_error(&self) -> bool {
        matches!(self, BugzillaError::Service { .. })
    }

    /// Check if this error is due to the connection or response shape.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, BugzillaError::Connection(_))
    }

    /// Check if the response could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, BugzillaError::Decode(_))
    }
}

impl From<reqwest::Error> for BugzillaError {
    fn from(err: reqwest::Error) -> Self {
        BugzillaError::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for BugzillaError {
    fn from(err: serde_json::Error) -> Self {
        BugzillaError::Decode(err.to_string())
    }
}
