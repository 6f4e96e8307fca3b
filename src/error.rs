//! Error types and handling for reqpack
//!
//! Transport-level outcomes (connection failures, protocol errors) are not
//! errors at this layer: they come back as a completed [`Exchange`] with a
//! non-success [`Outcome`] and are summarized into a [`Packet`]. The variants
//! here cover internal faults only, which are logged and then surfaced to the
//! caller unchanged.
//!
//! [`Exchange`]: crate::transport::Exchange
//! [`Outcome`]: crate::transport::Outcome
//! [`Packet`]: crate::packet::Packet

use thiserror::Error;

/// Result type alias for reqpack operations
pub type Result<T> = std::result::Result<T, RequestError>;

/// Internal faults raised by the send/extract pipeline
#[derive(Error, Debug)]
pub enum RequestError {
    /// The request payload could not be serialized to JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The background task awaiting the exchange failed to complete
    #[error("Exchange task failed: {0}")]
    TaskFailed(String),
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::Serialization(format!("JSON syntax error: {err}"))
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for RequestError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}
