//! Fixture HTTP server for exercising the fetch client.
//!
//! Serves small, fully deterministic endpoints: a fixed greeting, canned
//! status codes, a patterned payload of any requested length for
//! chunk-ordering tests, and a byte echo.

use axum::{
    body::Bytes,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

/// Largest `/payload/{len}` body the server will generate.
pub const MAX_PAYLOAD_LENGTH: usize = 8 * 1024 * 1024;

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/missing", get(missing))
        .route("/status/{code}", get(status))
        .route("/payload/{len}", get(payload))
        .route("/echo", post(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The deterministic body served by `/payload/{len}`: byte `i` is
/// `i mod 251`. The prime modulus keeps the pattern from aligning with
/// power-of-two buffer sizes, so reordered or dropped chunks are visible.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

async fn hello() -> &'static str {
    "hello"
}

async fn missing() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn payload(Path(len): Path<usize>) -> Result<Vec<u8>, StatusCode> {
    if len > MAX_PAYLOAD_LENGTH {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(pattern(len))
}

async fn echo(body: Bytes) -> Bytes {
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_deterministic() {
        assert_eq!(pattern(4), vec![0, 1, 2, 3]);
        assert_eq!(pattern(0), Vec::<u8>::new());
        assert_eq!(pattern(300), pattern(300));
    }

    #[test]
    fn pattern_wraps_at_modulus() {
        let p = pattern(260);
        assert_eq!(p[250], 250);
        assert_eq!(p[251], 0);
        assert_eq!(p[252], 1);
    }

    #[test]
    fn pattern_has_requested_length() {
        assert_eq!(pattern(100_000).len(), 100_000);
    }
}
