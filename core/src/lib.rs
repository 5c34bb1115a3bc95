//! Delegate-driven HTTP fetch client.
//!
//! # Overview
//! One `HttpClient` performs one fetch: it executes an immutable `Request`
//! through the ureq transport and forwards the lifecycle — response
//! metadata, body chunks in arrival order, a single terminal event — to an
//! optional, weakly-held `FetchDelegate`.
//!
//! # Design
//! - `run` blocks for the whole exchange; schedule it on a worker thread.
//! - Every delegate method defaults to a no-op, so callers implement only
//!   the events they care about. A client with no (or a dropped) delegate
//!   still completes its fetch.
//! - Exactly one of `on_finished` / `on_failed` fires per fetch, never
//!   both. `on_response` precedes any `on_data`.
//! - Body bytes stream through a receive buffer sized by two knobs
//!   (`initial_buffer_length`, `buffer_length`); the buffer doubles when a
//!   read fills it, and the growth is observable through `buffer_length()`.
//! - Redirects, TLS, and proxying are left entirely to the transport.

pub mod client;
pub mod delegate;
pub mod error;
pub mod http;

pub use client::{HttpClient, DEFAULT_BUFFER_LENGTH, MAX_BUFFER_LENGTH};
pub use delegate::FetchDelegate;
pub use error::FetchError;
pub use http::{Method, Request, Response};
