//! Fluent accumulation of request configuration
//!
//! A [`RequestBuilder`] collects a base URL, a path, and a header mapping,
//! then terminates into one of four immutable [`Request`]s. Terminal calls
//! snapshot the header map, so a builder can produce several independent
//! requests: headers added after a terminal call never leak into requests
//! already built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::request::{Method, Request};
use crate::transport::{HttpTransport, Transport};

/// Mutable, short-lived collector of request configuration
///
/// Inputs are stored verbatim: no URL validation, no path normalization.
/// Malformed values surface at send time as a protocol-error exchange.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    path: String,
    headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    /// Create a builder targeting `base_url`, executing over the default
    /// [`HttpTransport`]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(HttpTransport::new()))
    }

    /// Create a builder whose requests execute over the given transport
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            path: String::new(),
            headers: HashMap::new(),
            transport,
        }
    }

    /// Replace the path segment; the last call wins
    #[must_use]
    pub fn set_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Insert or overwrite a header; the last write per name wins
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.headers.insert(name.into(), value.into());
        self
    }

    /// Produce an immutable GET request
    #[must_use]
    pub fn to_get_request(&self) -> Request {
        self.build(Method::Get)
    }

    /// Produce an immutable POST request
    #[must_use]
    pub fn to_post_request(&self) -> Request {
        self.build(Method::Post)
    }

    /// Produce an immutable PUT request
    #[must_use]
    pub fn to_put_request(&self) -> Request {
        self.build(Method::Put)
    }

    /// Produce an immutable DELETE request
    #[must_use]
    pub fn to_delete_request(&self) -> Request {
        self.build(Method::Delete)
    }

    fn build(&self, method: Method) -> Request {
        // Snapshot the headers: requests built from one builder must never
        // alias a single live map.
        Request::from_parts(
            self.base_url.clone(),
            self.path.clone(),
            method,
            self.headers.clone(),
            Arc::clone(&self.transport),
        )
    }
}
