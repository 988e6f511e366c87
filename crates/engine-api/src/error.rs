//! Error type for every engine API operation.
//!
//! Variants fall into five groups, in the order a request can fail:
//!
//! 1. **Local validation**: rejected before any connection is attempted
//!    ([`Error::EmptyIdentifier`], [`Error::InvalidHost`],
//!    [`Error::UnsupportedTransport`]).
//! 2. **Transport**: dialing, HTTP framing, or cancellation
//!    ([`Error::Connect`], [`Error::ConnectTimeout`], [`Error::Http`],
//!    [`Error::Request`], [`Error::Url`], [`Error::Cancelled`]).
//! 3. **Protocol**: the engine answered with a status other than the one
//!    documented for the operation ([`Error::UnexpectedStatus`]). The body is
//!    not parsed; it is not guaranteed to be JSON.
//! 4. **Decode**: the status was right but the body was not
//!    ([`Error::Decode`], [`Error::MalformedResponse`]), or a request body
//!    could not be serialised ([`Error::Encode`]).
//! 5. **Embedded application errors**: a failure reported inside an
//!    otherwise successful stream ([`Error::Build`]).
//!
//! Nothing is retried by this crate.

use std::time::Duration;

use hyper::StatusCode;
use thiserror::Error;

/// Result type alias for engine API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the engine API client.
#[derive(Debug, Error)]
pub enum Error {
    /// An identifier was empty after trimming surrounding whitespace.
    #[error("{kind} ID cannot be empty")]
    EmptyIdentifier {
        /// Object kind, e.g. `"container"`.
        kind: &'static str,
    },

    /// The engine host address could not be parsed.
    #[error("invalid engine host '{host}': {reason}")]
    InvalidHost { host: String, reason: &'static str },

    /// The configured endpoint type cannot be dialed on this platform
    /// (a named pipe outside Windows, a Unix socket on Windows).
    #[error("engine host '{host}' is not reachable from this platform")]
    UnsupportedTransport { host: String },

    #[error("failed to connect to engine at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} connecting to engine at {endpoint}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    #[error("HTTP transport error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The cancellation token of a scoped client fired while the request or
    /// stream read was in flight.
    #[error("operation cancelled")]
    Cancelled,

    /// The engine answered with a status other than the operation's success
    /// status.
    #[error("{operation} failed: {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
    },

    /// The response status was as expected but the body could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A wait response was not JSON at all (e.g. a plaintext error from a
    /// proxy). Carries the raw text that was received.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The image build reported an error in its progress stream.
    #[error("build error: {message}")]
    Build { code: Option<i64>, message: String },
}

impl Error {
    /// Returns the HTTP status for [`Error::UnexpectedStatus`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the engine reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
