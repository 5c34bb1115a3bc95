//! Blocking HTTP fetch with delegate-driven delivery.
//!
//! # Design
//! `HttpClient` owns one request and performs one fetch. `run` blocks its
//! calling context for the whole exchange, so it belongs on a caller-managed
//! worker thread, not on anything latency-sensitive. Lifecycle events flow
//! to an optional weakly-held delegate; the terminal outcome is also
//! returned from `run` so delegate-less callers can observe it.
//!
//! The transport is ureq. Redirects, TLS validation, and proxying stay on
//! ureq's defaults — this client only adapts the callback shape and streams
//! the body through a growable receive buffer.

use std::io::Read;
use std::sync::{Arc, Weak};

use crate::delegate::FetchDelegate;
use crate::error::FetchError;
use crate::http::{Method, Request, Response};

/// Receive buffer size used when neither sizing knob is set.
pub const DEFAULT_BUFFER_LENGTH: usize = 16 * 1024;

/// Upper bound the receive buffer may grow to.
pub const MAX_BUFFER_LENGTH: usize = 256 * 1024;

/// One in-flight (or not-yet-started) HTTP fetch.
pub struct HttpClient {
    request: Request,
    initial_buffer_length: usize,
    buffer_length: usize,
    delegate: Option<Weak<dyn FetchDelegate>>,
}

impl HttpClient {
    /// Create an idle client for `request`. Nothing happens until [`run`].
    ///
    /// Both buffer knobs start at 0, meaning "use the built-in default"
    /// when the fetch begins.
    ///
    /// [`run`]: HttpClient::run
    pub fn new(request: Request) -> Self {
        Self {
            request,
            initial_buffer_length: 0,
            buffer_length: 0,
            delegate: None,
        }
    }

    /// The request this client was constructed with.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Starting capacity hint for the receive buffer. 0 means unset.
    pub fn initial_buffer_length(&self) -> usize {
        self.initial_buffer_length
    }

    pub fn set_initial_buffer_length(&mut self, length: usize) {
        self.initial_buffer_length = length;
    }

    /// Current (or, before the fetch starts, target) receive buffer size.
    ///
    /// The buffer doubles whenever a read fills it completely, capped at
    /// [`MAX_BUFFER_LENGTH`]; this getter reflects the growth during and
    /// after the fetch.
    pub fn buffer_length(&self) -> usize {
        self.buffer_length
    }

    pub fn set_buffer_length(&mut self, length: usize) {
        self.buffer_length = length;
    }

    /// Observe lifecycle events through `delegate`.
    ///
    /// Only a weak reference is stored: the client never extends the
    /// delegate's lifetime, and a delegate dropped mid-fetch simply stops
    /// receiving callbacks.
    pub fn set_delegate<D: FetchDelegate + 'static>(&mut self, delegate: &Arc<D>) {
        // Downgrade at the concrete type first; the unsizing to
        // `Weak<dyn FetchDelegate>` happens on assignment.
        let weak: Weak<D> = Arc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    /// Detach the delegate; the fetch itself is unaffected.
    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Perform the fetch, blocking until the terminal event.
    ///
    /// Delivery order on success: `on_response` once, `on_data` zero or
    /// more times in arrival order, `on_finished`. On failure `on_failed`
    /// fires instead of `on_finished`, possibly after some chunks were
    /// already delivered. Exactly one terminal callback fires per call.
    ///
    /// The returned `Result` carries the same terminal outcome, letting a
    /// caller without a delegate observe completion. HTTP error statuses
    /// are not failures: a 404 produces a response and `Ok(())`.
    pub fn run(&mut self) -> Result<(), FetchError> {
        self.buffer_length = self.starting_buffer_length();
        tracing::debug!("HTTP {} {}", self.request.method.as_str(), self.request.url);

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let response = match self.dispatch(&agent) {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err.into())),
        };

        let (parts, body) = response.into_parts();
        let response = Response {
            status: parts.status.as_u16(),
            headers: parts
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect(),
        };
        tracing::debug!("response status {}", response.status);
        if let Some(delegate) = self.live_delegate() {
            delegate.on_response(self, &response);
        }

        if let Err(err) = self.stream_body(body.into_reader()) {
            return Err(self.fail(err));
        }

        tracing::debug!("fetch finished: {}", self.request.url);
        if let Some(delegate) = self.live_delegate() {
            delegate.on_finished(self);
        }
        Ok(())
    }

    /// Pump body bytes through the receive buffer, delivering each chunk
    /// to the delegate in arrival order. `buffer_length` must already be
    /// resolved to a non-zero size.
    fn stream_body<R: Read>(&mut self, mut reader: R) -> Result<(), FetchError> {
        let mut buf = vec![0u8; self.buffer_length];
        loop {
            if buf.len() != self.buffer_length {
                buf.resize(self.buffer_length, 0);
            }
            match reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => {
                    tracing::trace!("received {n} bytes");
                    if let Some(delegate) = self.live_delegate() {
                        delegate.on_data(self, &buf[..n]);
                    }
                    // A completely filled buffer means the network is
                    // outpacing us; read larger chunks from here on.
                    if n == buf.len() && self.buffer_length < MAX_BUFFER_LENGTH {
                        self.buffer_length = (self.buffer_length * 2).min(MAX_BUFFER_LENGTH);
                    }
                }
                // EINTR is retryable per the io::Read contract.
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// The delegate, if one was assigned and is still alive.
    fn live_delegate(&self) -> Option<Arc<dyn FetchDelegate>> {
        self.delegate.as_ref()?.upgrade()
    }

    /// Resolve the sizing knobs into the buffer size the fetch starts with:
    /// `buffer_length` if set, else `initial_buffer_length`, else the
    /// built-in default.
    fn starting_buffer_length(&self) -> usize {
        if self.buffer_length != 0 {
            self.buffer_length
        } else if self.initial_buffer_length != 0 {
            self.initial_buffer_length
        } else {
            DEFAULT_BUFFER_LENGTH
        }
    }

    /// Execute the request through the agent. Status codes are returned as
    /// data, never as `Err`; only transport problems error here.
    fn dispatch(
        &self,
        agent: &ureq::Agent,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let req = &self.request;
        match (req.method, &req.body) {
            (Method::Get, _) => with_headers(agent.get(&req.url), &req.headers).call(),
            (Method::Head, _) => with_headers(agent.head(&req.url), &req.headers).call(),
            (Method::Delete, _) => with_headers(agent.delete(&req.url), &req.headers).call(),
            (Method::Post, Some(body)) => {
                with_headers(agent.post(&req.url), &req.headers).send(&body[..])
            }
            (Method::Post, None) => with_headers(agent.post(&req.url), &req.headers).send_empty(),
            (Method::Put, Some(body)) => {
                with_headers(agent.put(&req.url), &req.headers).send(&body[..])
            }
            (Method::Put, None) => with_headers(agent.put(&req.url), &req.headers).send_empty(),
        }
    }

    /// Deliver the single failure callback and hand the error back to `run`.
    fn fail(&self, err: FetchError) -> FetchError {
        tracing::debug!("fetch failed: {err}");
        if let Some(delegate) = self.live_delegate() {
            delegate.on_failed(self, &err);
        }
        err
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Counting {
        finished: Mutex<u32>,
    }

    impl FetchDelegate for Counting {
        fn on_finished(&self, _client: &HttpClient) {
            *self.finished.lock().unwrap() += 1;
        }
    }

    fn idle_client() -> HttpClient {
        HttpClient::new(Request::get("http://localhost:3000/hello"))
    }

    #[test]
    fn new_client_starts_with_unset_knobs() {
        let client = idle_client();
        assert_eq!(client.initial_buffer_length(), 0);
        assert_eq!(client.buffer_length(), 0);
    }

    #[test]
    fn unset_knobs_resolve_to_default() {
        let client = idle_client();
        assert_eq!(client.starting_buffer_length(), DEFAULT_BUFFER_LENGTH);
    }

    #[test]
    fn initial_length_used_when_buffer_length_unset() {
        let mut client = idle_client();
        client.set_initial_buffer_length(4096);
        assert_eq!(client.starting_buffer_length(), 4096);
    }

    #[test]
    fn buffer_length_takes_precedence_over_initial() {
        let mut client = idle_client();
        client.set_initial_buffer_length(4096);
        client.set_buffer_length(512);
        assert_eq!(client.starting_buffer_length(), 512);
    }

    #[test]
    fn delegate_is_held_weakly() {
        let mut client = idle_client();
        let delegate = Arc::new(Counting {
            finished: Mutex::new(0),
        });
        client.set_delegate(&delegate);
        assert!(client.live_delegate().is_some());

        drop(delegate);
        assert!(client.live_delegate().is_none());
    }

    #[test]
    fn clear_delegate_detaches() {
        let mut client = idle_client();
        let delegate = Arc::new(Counting {
            finished: Mutex::new(0),
        });
        client.set_delegate(&delegate);
        client.clear_delegate();
        assert!(client.live_delegate().is_none());
    }

    /// Collects every delivered chunk.
    struct Collecting {
        data: Mutex<Vec<u8>>,
    }

    impl FetchDelegate for Collecting {
        fn on_data(&self, _client: &HttpClient, chunk: &[u8]) {
            self.data.lock().unwrap().extend_from_slice(chunk);
        }
    }

    /// Reader that fails with `ErrorKind::Interrupted` on its first call,
    /// then serves `data` normally.
    struct InterruptedOnce {
        interrupted: bool,
        data: &'static [u8],
        pos: usize,
    }

    impl Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "interrupted",
                ));
            }
            let n = (self.data.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn interrupted_read_is_retried_not_terminal() {
        let mut client = idle_client();
        client.set_buffer_length(8);
        let delegate = Arc::new(Collecting {
            data: Mutex::new(Vec::new()),
        });
        client.set_delegate(&delegate);

        let reader = InterruptedOnce {
            interrupted: false,
            data: b"hello",
            pos: 0,
        };
        client.stream_body(reader).unwrap();
        assert_eq!(&delegate.data.lock().unwrap()[..], b"hello");
    }

    #[test]
    fn unreachable_host_fails_without_panicking_on_missing_delegate() {
        // Bind then drop a listener so the port is known-unreachable.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = HttpClient::new(Request::get(&format!("http://{addr}/hello")));
        assert!(client.run().is_err());
    }
}
