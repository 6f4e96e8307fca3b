//! Transport collaborator: the component that performs the actual HTTP call
//!
//! The send pipeline in [`crate::request`] never touches the network itself.
//! It assembles a [`TransportRequest`] and hands it to a [`Transport`], which
//! resolves to an [`Exchange`] once the wire round-trip has completed. The
//! transport never returns an error: every outcome, including its own
//! internal failures, is encoded in the exchange so that callers deal with a
//! single completion shape.
//!
//! [`HttpTransport`] is the default implementation over a shared
//! `reqwest::Client`. Tests and embedders can substitute their own transport
//! to run the pipeline headlessly.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::request::Method;

/// How a completed exchange ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The exchange completed and a response was received. Note that a
    /// non-2xx status code still counts as a completed exchange; callers
    /// that care inspect the response code themselves.
    Success,
    /// The host could not be reached, or the connection was lost mid-flight
    ConnectionError,
    /// The exchange failed above the connection layer: malformed request,
    /// HTTP protocol violation, or an undecodable response
    ProtocolError,
    /// The exchange was aborted before completion. [`HttpTransport`] never
    /// produces this; it exists for transports that support cancellation.
    Aborted,
}

impl Outcome {
    /// Whether the exchange completed with a response
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "Success",
            Self::ConnectionError => "ConnectionError",
            Self::ProtocolError => "ProtocolError",
            Self::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}

/// A fully assembled HTTP request, ready for the wire
///
/// Headers are applied in arbitrary iteration order; header semantics are
/// order-independent, so no ordering is guaranteed or needed.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Full target URL, already assembled by the request layer
    pub url: String,
    /// Header name/value mapping, names unique
    pub headers: HashMap<String, String>,
    /// Raw body bytes, or `None` for a body-less request
    pub body: Option<Vec<u8>>,
}

/// The raw result of a completed exchange, as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// How the exchange ended
    pub outcome: Outcome,
    /// HTTP status code, or 0 if no response was ever received
    pub status: u16,
    /// Diagnostic text; populated for every non-success outcome
    pub error: Option<String>,
    /// Response text; may hold partial data on failure
    pub body: Option<String>,
}

impl Exchange {
    /// A successful exchange with the given status and response text
    #[must_use]
    pub const fn success(status: u16, body: String) -> Self {
        Self {
            outcome: Outcome::Success,
            status,
            error: None,
            body: Some(body),
        }
    }

    /// A failed exchange; `status` is 0 when no response code was received
    #[must_use]
    pub const fn failure(outcome: Outcome, status: u16, error: String) -> Self {
        Self {
            outcome,
            status,
            error: Some(error),
            body: None,
        }
    }
}

/// The collaborator that executes assembled requests against the network
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and resolve once the exchange has completed.
    ///
    /// Implementations must not return early: the returned future completes
    /// only when the exchange has a final outcome, and every failure mode is
    /// encoded as a non-success [`Exchange`] rather than a panic or error.
    async fn execute(&self, request: TransportRequest) -> Exchange;
}

/// Default transport over a shared `reqwest::Client`
///
/// Connection pooling, TLS, redirects, and timeouts are whatever the wrapped
/// client is configured with; this layer adds no policy of its own.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest::Client`
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport from a pre-configured client, e.g. one with tuned
    /// pool sizes or timeouts
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Exchange {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // A malformed URL or illegal header surfaces here as a builder
        // error, mapped to ProtocolError like any other non-network failure.
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let status = err.status().map_or(0, |code| code.as_u16());
                return Exchange::failure(classify(&err), status, err.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(text) => Exchange::success(status, text),
            Err(err) => Exchange::failure(Outcome::ProtocolError, status, err.to_string()),
        }
    }
}

fn classify(err: &reqwest::Error) -> Outcome {
    if err.is_connect() || err.is_timeout() {
        Outcome::ConnectionError
    } else {
        Outcome::ProtocolError
    }
}
