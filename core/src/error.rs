//! Error types for the poll service client.
//!
//! # Design
//! Non-2xx statuses are not errors here: they come back as `HttpResponse`
//! values. Connection refused is not an error either; service methods turn it
//! into `Ok(None)`. What remains is local failure: a payload that would not
//! encode, a body that would not decode, or a transport fault other than a
//! refused connection.

use thiserror::Error;

/// Errors returned by `PollServiceClient` and `HttpResponse::json`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The transport failed for a reason other than a refused connection
    /// (bad URL, DNS, TLS, timeout, broken body).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The host could not be reached at all.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("{0}")]
    Other(String),
}
