//! Request context passed to handlers
//!
//! The request is read-only during dispatch. The response is shared by every
//! handler that runs for one request; each write replaces the previous value
//! of the same field.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static NEXT_TRACE_ID: AtomicU64 = AtomicU64::new(1);

/// Inbound request as seen by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    /// Identifier used only in log events
    pub trace_id: u64,
    pub peer: Option<SocketAddr>,
    pub received_at: Instant,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            trace_id: NEXT_TRACE_ID.fetch_add(1, Ordering::Relaxed),
            peer: None,
            received_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }
}

/// Response state built up by handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Set a header, replacing any previous value (names compare case-insensitively).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name.to_string(), value));
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Shared, mutable handle to the response of one request.
#[derive(Debug, Clone, Default)]
pub struct ResponseHandle {
    inner: Arc<Mutex<Response>>,
}

impl ResponseHandle {
    fn lock(&self) -> MutexGuard<'_, Response> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_status(&self, status: u16) {
        self.lock().status = status;
    }

    pub fn status(&self) -> u16 {
        self.lock().status
    }

    pub fn set_header(&self, name: &str, value: impl Into<String>) {
        self.lock().set_header(name, value);
    }

    /// Replace the body.
    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        self.lock().body = body.into();
    }

    /// Append to the body.
    pub fn write(&self, chunk: impl AsRef<[u8]>) {
        self.lock().body.extend_from_slice(chunk.as_ref());
    }

    /// Move the current state out, leaving a default response behind.
    pub(crate) fn take(&self) -> Response {
        std::mem::take(&mut *self.lock())
    }
}

/// Context a handler is constructed with
#[derive(Debug, Clone)]
pub struct HandlerContext {
    request: Arc<Request>,
    response: ResponseHandle,
}

impl HandlerContext {
    pub(crate) const fn new(request: Arc<Request>, response: ResponseHandle) -> Self {
        Self { request, response }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub const fn response(&self) -> &ResponseHandle {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_ids_are_unique() {
        let a = Request::new("GET", "/");
        let b = Request::new("GET", "/");
        assert_ne!(a.trace_id, b.trace_id);
    }

    #[test]
    fn test_last_write_wins() {
        let handle = ResponseHandle::default();
        handle.set_status(201);
        handle.set_status(404);
        handle.set_header("Content-Type", "text/plain");
        handle.set_header("content-type", "application/json");
        handle.write("a");
        handle.write("b");

        let response = handle.take();
        assert_eq!(response.status, 404);
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body, b"ab");
    }

    #[test]
    fn test_take_resets_state() {
        let handle = ResponseHandle::default();
        handle.set_body("x");
        let _ = handle.take();
        assert_eq!(handle.status(), 200);
    }
}
