//! Request-building and dispatch core for the Matrix client-server r0 API.
//!
//! # Overview
//! Maps semantic operations (login, room messaging, membership, account
//! administration, ...) to plain-data HTTP request descriptors, and
//! normalizes raw responses into success values or structured protocol
//! errors. The builder layer never touches the network; an injected
//! [`Transport`](dispatch::Transport) executes the round trip.
//!
//! # Design
//! - [`Client`] is stateless — it holds only `base_url`; every operation is
//!   a pure method producing a [`Request`].
//! - Identifiers embedded in paths are percent-encoded exactly once by the
//!   builder; the transport must not re-encode.
//! - [`Dispatcher`] is single-attempt: one transport call, then
//!   [`classify`](dispatch::classify). No retries, no backoff, no hidden
//!   global client configuration.
//! - Any 4xx response becomes a [`MatrixError`]; undecodable 4xx bodies fail
//!   loudly as [`Error::MalformedResponse`] instead of degrading into empty
//!   protocol errors.

pub mod auth;
pub mod client;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod events;
pub mod http;

pub use auth::{Auth, UserIdentifier};
pub use client::Client;
pub use dispatch::{classify, Dispatcher, Transport};
pub use error::{Error, MatrixError};
pub use events::{MessageKind, RoomEvent, StateEvent};
pub use http::{Method, Request, Response};
