//! Error types for API operations.
//!
//! Three failure kinds stay distinguishable to callers: the transport failed,
//! the service sent something unusable, or the service declined the request.

use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP exchange itself failed.
    Transport,
    /// The response could not be made sense of.
    Protocol,
    /// The service reported a non-success status.
    Remote,
}

/// Errors returned by [`ApiClient`](super::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, connect, TLS, timeout, body read).
    ///
    /// The reqwest error is kept as-is in `source`.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        /// Endpoint path that was being called.
        endpoint: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body or a field in it was unusable.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The envelope status was not the success code.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ApiError {
    /// Creates a transport error for an endpoint.
    pub(crate) fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { endpoint, source }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }

    /// Returns the remote error when the service declined the request.
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

/// Declared failure reported by the service inside a well-formed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service rejected request (status {status}): {message}")]
pub struct RemoteError {
    status: i64,
    message: String,
}

impl RemoteError {
    pub(crate) fn new(status: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Envelope status code.
    #[must_use]
    pub fn status(&self) -> i64 {
        self.status
    }

    /// Envelope `msg` text, verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Local failure to make sense of a received response.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Body was not a `{status, msg, result}` envelope.
    #[error("malformed response from {endpoint} (HTTP {http_status}): {source}")]
    MalformedEnvelope {
        /// Endpoint path that produced the body.
        endpoint: &'static str,
        /// HTTP status line code of the response.
        http_status: u16,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Envelope reported success but `result` did not have the expected shape.
    #[error("unexpected result payload from {endpoint}: {source}")]
    MalformedPayload {
        /// Endpoint path that produced the payload.
        endpoint: &'static str,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A timestamp field did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp in `{field}`: '{value}'")]
    InvalidTimestamp {
        /// Payload field name.
        field: &'static str,
        /// Raw field value.
        value: String,
        /// Parser error.
        #[source]
        source: chrono::ParseError,
    },
}

/// Errors constructing an [`ApiClient`](super::ApiClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// Base URL could not be parsed or is not http(s).
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client builder failed.
    #[error("HTTP client construction failed: {reason}")]
    HttpClient {
        /// Builder failure description.
        reason: String,
    },
}
