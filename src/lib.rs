#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! ## Architecture
//!
//! This library is organized into a few small modules:
//!
//! - **[`builder`]** - Fluent accumulation of request configuration
//! - **[`request`]** - Immutable request descriptors and the send pipeline
//! - **[`transport`]** - The transport seam and the `reqwest`-backed default
//! - **[`packet`]** - Result packaging for completed exchanges
//! - **[`error`]** - Error types for internal pipeline faults
//!
//! ## Flow
//!
//! Caller → [`RequestBuilder`] → [`Request`] → `send_*` →
//! [`Transport`] → [`Exchange`] → [`extract_packet`] → [`Packet`].

pub mod builder;
pub mod error;
pub mod packet;
pub mod request;
pub mod transport;

pub use builder::RequestBuilder;
pub use error::{RequestError, Result};
pub use packet::{extract_packet, Packet};
pub use request::{Method, PendingExchange, Request, RequestBody};
pub use transport::{Exchange, HttpTransport, Outcome, Transport, TransportRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "reqpack";
