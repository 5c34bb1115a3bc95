//! Error type for a failed fetch.
//!
//! # Design
//! A fetch fails in exactly one way: the transport could not complete the
//! exchange. Connection refusals, timeouts, TLS problems, and mid-body read
//! errors all collapse into one `FetchError` carrying an opaque diagnostic
//! message. The client deliberately does not classify errors as retryable or
//! fatal — that policy belongs to the caller. HTTP error statuses (4xx/5xx)
//! are not errors at all; they arrive as an ordinary response.

use std::fmt;

/// A terminal fetch failure with an opaque diagnostic message.
#[derive(Debug, Clone)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message describing what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch failed: {}", self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
