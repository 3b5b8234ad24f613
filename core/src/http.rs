//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! `FactsClient` builds an `HttpRequest` and parses an `HttpResponse` as
//! plain data. Executing the round-trip is the job of a `Transport`, which is
//! the only place the crate touches the network. Tests swap in a recording
//! double; production uses `UreqTransport`.

use crate::error::TransportError;

/// An outbound GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw bytes; decoding is left to the caller.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A 200 response with the given body and no headers.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a single `HttpRequest`.
///
/// Implementations must return non-2xx statuses as `Ok(HttpResponse)` and
/// reserve `Err` for failures where no response was obtained (connection,
/// DNS, timeout, unreadable body).
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_2xx_only() {
        let mut response = HttpResponse::ok("{}");
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 503;
        assert!(!response.is_success());
    }
}
