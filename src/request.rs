//! Immutable request descriptors and the send pipeline
//!
//! A [`Request`] is produced by [`RequestBuilder`] and is immutable from that
//! point on: its identity (base URL, path, method) and header snapshot never
//! change. The `send_*` family assembles the final wire request — including
//! any per-call `Content-Type` overlay — and hands it to the transport,
//! returning a [`PendingExchange`] that resolves once the round-trip
//! completes. A single `Request` may be sent any number of times.
//!
//! [`RequestBuilder`]: crate::builder::RequestBuilder

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{debug, trace};

use crate::builder::RequestBuilder;
use crate::error::Result;
use crate::transport::{Exchange, Transport, TransportRequest};

/// HTTP method for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// The method's wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload source for the low-level send entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// Raw bytes, uploaded verbatim with no content-type overlay
    Raw(Vec<u8>),
}

/// An in-flight exchange: a future resolving to the raw completed
/// [`Exchange`], or to an internal fault.
///
/// Transport-level failures are not `Err` here — they arrive as a completed
/// exchange with a non-success outcome. `Err` is reserved for faults inside
/// the pipeline itself (serialization, task failure).
pub type PendingExchange = BoxFuture<'static, Result<Exchange>>;

/// Immutable descriptor of one HTTP call plus its execution capability
#[derive(Clone)]
pub struct Request {
    base_url: String,
    path: String,
    method: Method,
    headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl Request {
    /// Start a fluent builder for the given base URL
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(base_url)
    }

    pub(crate) const fn from_parts(
        base_url: String,
        path: String,
        method: Method,
        headers: HashMap<String, String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url,
            path,
            method,
            headers,
            transport,
        }
    }

    /// The base URL this request targets
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The path segment appended to the base URL
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fixed HTTP method
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The header snapshot taken when the request was built
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The full target URL: `{base_url}/{path}`, exact concatenation.
    ///
    /// No slash normalization is performed; callers own their separators.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.path)
    }

    /// Send with no body and no content-type
    #[must_use]
    pub fn send(&self) -> PendingExchange {
        self.dispatch(None, RequestBody::Empty)
    }

    /// Send the UTF-8 bytes of `body` verbatim with `Content-Type: text/plain`
    #[must_use]
    pub fn send_text(&self, body: impl Into<String>) -> PendingExchange {
        let body = body.into();
        self.dispatch(Some("text/plain"), RequestBody::Raw(body.into_bytes()))
    }

    /// Serialize `value` to JSON and send it with
    /// `Content-Type: application/json`.
    ///
    /// A serialization failure surfaces through the pending exchange as
    /// [`RequestError::Serialization`](crate::error::RequestError).
    #[must_use]
    pub fn send_json<T: Serialize>(&self, value: &T) -> PendingExchange {
        match serde_json::to_string(value) {
            Ok(text) => self.dispatch(Some("application/json"), RequestBody::Raw(text.into_bytes())),
            Err(err) => future::ready(Err(err.into())).boxed(),
        }
    }

    /// The low-level entry point the other sends funnel into: upload the
    /// given body with the accumulated headers verbatim, content-type unset
    #[must_use]
    pub fn send_body(&self, body: RequestBody) -> PendingExchange {
        self.dispatch(None, body)
    }

    /// Assemble the wire request and hand it to the transport.
    ///
    /// The content-type overlay is applied to a copy of the header snapshot;
    /// the request itself is never mutated, so concurrent sends with
    /// different bodies stay independent.
    fn dispatch(&self, content_type: Option<&str>, body: RequestBody) -> PendingExchange {
        let mut headers = self.headers.clone();
        if let Some(value) = content_type {
            let _ = headers.insert("Content-Type".to_string(), value.to_string());
        }
        let request = TransportRequest {
            method: self.method,
            url: self.url(),
            headers,
            body: match body {
                RequestBody::Empty => None,
                RequestBody::Raw(bytes) => Some(bytes),
            },
        };
        let transport = Arc::clone(&self.transport);

        Box::pin(async move {
            debug!(method = %request.method, url = %request.url, "sending request");
            let exchange = transport.execute(request).await;
            log_completion(&exchange);
            Ok(exchange)
        })
    }
}

/// Post-completion diagnostics. Advisory only: nothing here may alter the
/// exchange or escape as an error.
fn log_completion(exchange: &Exchange) {
    if !exchange.outcome.is_success() {
        debug!(
            outcome = %exchange.outcome,
            status = exchange.status,
            error = exchange.error.as_deref().unwrap_or(""),
            "exchange failed",
        );
        return;
    }
    if let Some(text) = exchange.body.as_deref() {
        if text.trim().is_empty() {
            return;
        }
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => debug!(status = exchange.status, body = %value, "exchange completed"),
            Err(err) => trace!(status = exchange.status, error = %err, "response body is not JSON"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::RequestError;

    /// Transport double that records the assembled request and replies with
    /// a canned exchange.
    struct RecordingTransport {
        seen: Mutex<Option<TransportRequest>>,
        reply: Exchange,
    }

    impl RecordingTransport {
        fn replying(reply: Exchange) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(None),
                reply,
            })
        }

        fn ok() -> Arc<Self> {
            Self::replying(Exchange::success(200, "{}".to_string()))
        }

        fn seen(&self) -> TransportRequest {
            self.seen.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: TransportRequest) -> Exchange {
            *self.seen.lock().unwrap() = Some(request);
            self.reply.clone()
        }
    }

    fn request_with(transport: Arc<RecordingTransport>, method: Method) -> Request {
        Request::from_parts(
            "https://api.test".to_string(),
            "users".to_string(),
            method,
            HashMap::from([("Authorization".to_string(), "Bearer t".to_string())]),
            transport,
        )
    }

    #[test]
    fn url_is_exact_concatenation_without_normalization() {
        let transport = RecordingTransport::ok();
        let request = Request::from_parts(
            "https://api.test/".to_string(),
            "/users".to_string(),
            Method::Get,
            HashMap::new(),
            transport,
        );
        assert_eq!(request.url(), "https://api.test///users");
    }

    #[tokio::test]
    async fn send_has_no_body_and_no_content_type() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Get);

        request.send().await.unwrap();

        let seen = transport.seen();
        assert_eq!(seen.method, Method::Get);
        assert_eq!(seen.url, "https://api.test/users");
        assert!(seen.body.is_none());
        assert!(!seen.headers.contains_key("Content-Type"));
        assert_eq!(seen.headers.get("Authorization").unwrap(), "Bearer t");
    }

    #[tokio::test]
    async fn send_text_sets_text_plain_and_uploads_verbatim_bytes() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Post);

        request.send_text("héllo\nworld").await.unwrap();

        let seen = transport.seen();
        assert_eq!(seen.headers.get("Content-Type").unwrap(), "text/plain");
        assert_eq!(seen.body.unwrap(), "héllo\nworld".as_bytes());
    }

    #[tokio::test]
    async fn send_json_sets_application_json_and_uploads_serialized_value() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Post);
        let value = serde_json::json!({ "name": "a" });

        request.send_json(&value).await.unwrap();

        let seen = transport.seen();
        assert_eq!(seen.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(seen.body.unwrap(), serde_json::to_vec(&value).unwrap());
    }

    #[tokio::test]
    async fn send_json_surfaces_serialization_failure_as_internal_fault() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Post);
        // Non-string map keys cannot be represented in JSON.
        let unserializable = BTreeMap::from([(vec![1u8], 1)]);

        let err = request.send_json(&unserializable).await.unwrap_err();

        assert!(matches!(err, RequestError::Serialization(_)));
        assert!(transport.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn send_body_uploads_raw_bytes_without_content_type() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Put);

        request
            .send_body(RequestBody::Raw(vec![0xde, 0xad]))
            .await
            .unwrap();

        let seen = transport.seen();
        assert_eq!(seen.body.unwrap(), vec![0xde, 0xad]);
        assert!(!seen.headers.contains_key("Content-Type"));
    }

    #[tokio::test]
    async fn content_type_overlay_never_mutates_the_request() {
        let transport = RecordingTransport::ok();
        let request = request_with(Arc::clone(&transport), Method::Post);

        request.send_text("one").await.unwrap();
        assert!(!request.headers().contains_key("Content-Type"));

        // A later body-less send must not inherit the earlier overlay.
        request.send().await.unwrap();
        assert!(!transport.seen().headers.contains_key("Content-Type"));
    }

    #[tokio::test]
    async fn non_json_response_body_does_not_fail_the_send() {
        let transport =
            RecordingTransport::replying(Exchange::success(200, "plain, not json".to_string()));
        let request = request_with(Arc::clone(&transport), Method::Get);

        let exchange = request.send().await.unwrap();

        assert!(exchange.outcome.is_success());
        assert_eq!(exchange.body.as_deref(), Some("plain, not json"));
    }
}
