//! HTTP descriptor types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `Request` values without ever touching the network — an
//! injected [`Transport`](crate::dispatch::Transport) executes them and hands
//! back a `Response`. This separation keeps the builder layer deterministic
//! and easy to test.
//!
//! The response body is kept as the raw JSON text rather than a decoded
//! value so that the classifier owns decoding and can distinguish a
//! well-formed protocol error from a 4xx body that does not parse at all.
//!
//! All fields use owned types (`String`, `Vec`, `Map`) so values carry no
//! lifetime ties to the client that built them.

use serde_json::{Map, Value};

use crate::encode::encode_query_component;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl Method {
    /// Wire name of the method, e.g. `"GET"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

/// One HTTP call described as plain data.
///
/// Built by [`Client`](crate::client::Client) methods. Fully determined by
/// the builder's inputs: no hidden state, no generated timestamps or ids.
/// `query_params` is sorted by key at construction time so descriptors
/// compare deterministically. Path segments holding caller-supplied
/// identifiers are already percent-encoded; the transport must not encode
/// them again.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub base_url: String,
    pub path: String,
    pub query_params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Map<String, Value>,
}

impl Request {
    /// Full URL: `base_url + path`, plus the encoded query string when any
    /// query parameters are present.
    pub fn url(&self) -> String {
        if self.query_params.is_empty() {
            return format!("{}{}", self.base_url, self.path);
        }
        let query: Vec<String> = self
            .query_params
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query_component(k), encode_query_component(v)))
            .collect();
        format!("{}{}?{}", self.base_url, self.path, query.join("&"))
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing a [`Request`], then passed
/// to [`classify`](crate::dispatch::classify) for normalization. `body` is
/// the raw response text, undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
