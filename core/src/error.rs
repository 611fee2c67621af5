//! Error types for the Unipile request adapter.
//!
//! # Design
//! Configuration and argument errors are raised locally, before any request
//! leaves the process. Every non-2xx response lands in `Http` with the raw
//! status code and body so the caller sees exactly what the remote API said.
//! An empty or non-JSON success body is not an error at all; see
//! `UnipileClient::parse_response`.

use thiserror::Error;

/// Errors returned by the adapter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials or base endpoint could not be resolved.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A call argument is missing, unknown, or of the wrong shape.
    #[error("invalid argument `{parameter}`: {reason}")]
    InvalidArgument { parameter: String, reason: String },

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
