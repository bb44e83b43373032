//! Request dispatch and response classification.
//!
//! # Design
//! The transport is an explicit dependency injected at construction time —
//! never a process-global client selection. `Dispatcher` performs exactly one
//! transport round trip per call and holds no cross-call state; retries,
//! backoff, and pooling belong to the transport or the caller.
//!
//! Classification is driven by the status code alone: any 4xx becomes a
//! structured [`MatrixError`]; everything else — including 5xx and redirects
//! — passes through unchanged, and callers that care about server errors
//! inspect [`Response::status`] themselves. That passthrough is deliberate:
//! the classifier normalizes what the protocol defines and refuses to invent
//! policy for statuses the protocol leaves open.

use log::debug;

use crate::error::{Error, MatrixError};
use crate::http::{Request, Response};

/// The external HTTP capability: executes one request, returns the raw
/// status/headers/body, or fails with [`Error::Transport`].
///
/// Implementations must not retry, must not follow protocol-level semantics,
/// and must return 4xx/5xx responses as data rather than errors so the
/// classifier can interpret them.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<Response, Error>;
}

/// Single-attempt dispatcher: one transport round trip plus classification.
#[derive(Debug)]
pub struct Dispatcher<T: Transport> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Execute `request` and normalize the outcome.
    ///
    /// Transport failures propagate as [`Error::Transport`]; 4xx responses
    /// become [`Error::Api`] (or [`Error::MalformedResponse`] when the body
    /// does not decode); everything else is returned as-is.
    pub fn dispatch(&self, request: &Request) -> Result<Response, Error> {
        debug!("dispatch {} {}", request.method.as_str(), request.url());
        let response = self.transport.execute(request)?;
        debug!(
            "{} {} -> {}",
            request.method.as_str(),
            request.path,
            response.status
        );
        classify(response)
    }
}

/// Normalize a raw response: 4xx becomes a structured protocol error,
/// everything else passes through unchanged.
pub fn classify(response: Response) -> Result<Response, Error> {
    if !(400..500).contains(&response.status) {
        return Ok(response);
    }
    match serde_json::from_str::<MatrixError>(&response.body) {
        Ok(mut error) => {
            error.status = response.status;
            Err(Error::Api(error))
        }
        Err(_) => Err(Error::MalformedResponse {
            status: response.status,
            body: response.body,
        }),
    }
}
