//! Error types for the Matrix client core.
//!
//! # Design
//! Protocol errors (`Api`) get a dedicated structured record because callers
//! routinely branch on the server's error code (`M_FORBIDDEN`,
//! `M_UNKNOWN_TOKEN`, `M_LIMIT_EXCEEDED`, ...). A 4xx body that does not
//! decode into that record lands in `MalformedResponse` instead — an
//! undecodable error must never masquerade as a well-formed one with empty
//! fields. Transport failures stay separate so callers can tell "the server
//! rejected this" from "the server was never reached."

use std::fmt;

use serde::Deserialize;

/// Errors returned by the dispatcher, classifier, and payload helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The server answered with a 4xx status and a well-formed protocol
    /// error body.
    Api(MatrixError),

    /// The server answered with a 4xx status but the body was not a
    /// decodable protocol error.
    MalformedResponse { status: u16, body: String },

    /// The transport failed before a response was produced (connection
    /// refused, DNS, TLS, timeout). Never retried by this layer.
    Transport(String),

    /// A payload helper was given structurally invalid input, e.g. a file
    /// message without a `url`. Raised before any network involvement.
    Construction(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api(e) => write!(f, "{e}"),
            Error::MalformedResponse { status, body } => {
                write!(f, "HTTP {status} with undecodable error body: {body}")
            }
            Error::Transport(msg) => write!(f, "transport failure: {msg}"),
            Error::Construction(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// A structured protocol error parsed from a 4xx response body.
///
/// `status` is filled in by the classifier from the HTTP status line, not
/// deserialized. The four optional fields stay `None` unless the server
/// actually sent them; `None` is distinguishable from any real value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatrixError {
    /// Server-defined error code, e.g. `M_FORBIDDEN`.
    pub errcode: String,

    /// Human-readable message. Empty if the server omitted it.
    #[serde(default)]
    pub error: String,

    /// HTTP status code of the response this error was parsed from.
    #[serde(skip)]
    pub status: u16,

    /// Present on `M_UNKNOWN_TOKEN` when re-login may restore the session
    /// without wiping client state.
    pub soft_logout: Option<bool>,

    /// Present on `M_LIMIT_EXCEEDED`: server-advised backoff in ms.
    pub retry_after_ms: Option<u64>,

    /// Present on `M_INCOMPATIBLE_ROOM_VERSION`.
    pub room_version: Option<String>,

    /// Present on `M_RESOURCE_LIMIT_EXCEEDED`.
    pub admin_contact: Option<String>,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {}): {}", self.errcode, self.status, self.error)
    }
}
