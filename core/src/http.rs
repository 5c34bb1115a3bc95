//! Request and response types described as plain data.
//!
//! # Design
//! A `Request` is an immutable description of one HTTP call, built by the
//! caller before constructing an `HttpClient`. The client never mutates or
//! re-validates it; whether the URL is reachable or the headers are sensible
//! is the transport's business. A `Response` carries reply metadata only —
//! body bytes travel exclusively through the delegate's data callback, never
//! as an accumulated field.
//!
//! All fields use owned types (`String`, `Vec`) so a request can be moved
//! onto whatever worker context ends up driving the fetch.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

/// An immutable description of the HTTP call a client will perform.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// A GET request with no headers and no body.
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request carrying `body`.
    pub fn post(url: &str, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.to_string(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Append one header, builder-style.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Metadata about the HTTP reply: status and headers, no body.
///
/// Delivered at most once per fetch, before any body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl Response {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_produces_bare_request() {
        let req = Request::get("http://localhost:3000/hello");
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "http://localhost:3000/hello");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_carries_body() {
        let req = Request::post("http://localhost:3000/echo", b"ping".to_vec());
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body.as_deref(), Some(&b"ping"[..]));
    }

    #[test]
    fn header_appends_in_order() {
        let req = Request::get("http://localhost:3000/")
            .header("Accept", "text/plain")
            .header("X-Trace", "1");
        assert_eq!(req.headers[0].0, "Accept");
        assert_eq!(req.headers[1].0, "X-Trace");
    }

    #[test]
    fn method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Head.as_str(), "HEAD");
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let resp = Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        };
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("x-missing"), None);
    }
}
