//! Outbound side of the relay: the trade-document store and the MT700
//! synthesis endpoint, both served from the same backend base address.

pub mod client;
pub mod retry;
pub mod types;

pub use client::BackendClient;
pub use retry::{RetryPolicy, Retryable};
pub use types::{ComposedRequest, DocumentKind, DocumentRef};
