//! Distilling a completed exchange into a caller-friendly result value
//!
//! [`extract_packet`] offloads an in-flight exchange to the runtime's worker
//! pool, awaits completion there, and summarizes the raw [`Exchange`] into an
//! immutable [`Packet`]. Transport failures become non-success packets;
//! internal faults are logged and then returned to the caller unchanged.

use std::future::Future;

use tracing::error;

use crate::error::Result;
use crate::transport::{Exchange, Outcome};

/// Immutable summary of one completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// How the exchange ended
    pub result: Outcome,
    /// HTTP status code, or 0 if no response was ever received
    pub response_code: u16,
    /// Diagnostic text; empty on success, non-empty otherwise
    pub error: String,
    /// Response text; present only on success. A failed exchange never
    /// carries a body here, even if the transport produced partial text.
    pub body: Option<String>,
}

impl Packet {
    /// Distill a raw exchange into its packet summary
    #[must_use]
    pub fn from_exchange(exchange: Exchange) -> Self {
        if exchange.outcome.is_success() {
            Self {
                result: exchange.outcome,
                response_code: exchange.status,
                error: String::new(),
                body: Some(exchange.body.unwrap_or_default()),
            }
        } else {
            Self {
                result: exchange.outcome,
                response_code: exchange.status,
                error: exchange
                    .error
                    .unwrap_or_else(|| exchange.outcome.to_string()),
                body: None,
            }
        }
    }

    /// Whether the exchange completed with a response
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Await a pending exchange on the worker pool and package its outcome.
///
/// The exchange is spawned onto the tokio runtime so a slow round-trip never
/// monopolizes the calling task. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns the pipeline's own fault (e.g. a serialization failure) or a
/// [`RequestError::TaskFailed`](crate::error::RequestError) if the spawned
/// task itself failed. Both are logged before being returned; transport-level
/// failures are not errors and arrive as a non-success packet instead.
pub async fn extract_packet<F>(pending: F) -> Result<Packet>
where
    F: Future<Output = Result<Exchange>> + Send + 'static,
{
    match tokio::spawn(pending).await {
        Ok(Ok(exchange)) => Ok(Packet::from_exchange(exchange)),
        Ok(Err(err)) => {
            error!(error = %err, "send failed before the exchange completed");
            Err(err)
        }
        Err(err) => {
            error!(error = %err, "exchange task failed");
            Err(err.into())
        }
    }
}
