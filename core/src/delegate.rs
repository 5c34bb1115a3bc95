//! Observer protocol for fetch lifecycle events.
//!
//! # Design
//! Every method has a no-op default body, so a delegate may implement any
//! subset of the protocol — `impl FetchDelegate for Quiet {}` is valid and
//! simply ignores everything. The client holds the delegate through a weak
//! reference and checks liveness before each call, so implementors never
//! need to outlive the fetch; a dropped delegate just stops receiving
//! events.
//!
//! Callbacks are invoked from whatever context drives the fetch (normally
//! the worker thread running [`HttpClient::run`]), hence the `Send + Sync`
//! bound. Serializing them onto some other context is the caller's job.
//!
//! [`HttpClient::run`]: crate::client::HttpClient::run

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::http::Response;

/// Lifecycle observer for one fetch.
///
/// Per fetch: `on_response` fires at most once and before any `on_data`;
/// `on_data` fires zero or more times with body chunks in arrival order;
/// exactly one of `on_finished` / `on_failed` fires last, never both.
pub trait FetchDelegate: Send + Sync {
    /// Reply status and headers are available.
    fn on_response(&self, _client: &HttpClient, _response: &Response) {}

    /// A chunk of body bytes arrived.
    fn on_data(&self, _client: &HttpClient, _chunk: &[u8]) {}

    /// The fetch completed successfully.
    fn on_finished(&self, _client: &HttpClient) {}

    /// The fetch failed; previously delivered chunks stand as a partial
    /// result.
    fn on_failed(&self, _client: &HttpClient, _error: &FetchError) {}
}
