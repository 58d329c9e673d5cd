//! Blocking client for the poll service REST API.
//!
//! # Overview
//! `PollServiceClient` exposes one method per endpoint: register, login,
//! vote, results, list, create, get and delete. Every call is a single HTTP
//! round-trip whose response (any status) is returned as-is.
//!
//! # Design
//! - `PollRequests` builds requests as plain data, with no I/O.
//! - `Transport` executes them; `UreqTransport` is the default.
//! - Status codes are never interpreted by the client. A refused connection
//!   becomes `Ok(None)`, other transport faults become `ApiError::Transport`.
//! - Response DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod config;
pub mod error;
pub mod http;
pub mod requests;
pub mod service;
pub mod transport;
pub mod types;

pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use requests::PollRequests;
pub use service::{ApiResult, PollServiceClient};
pub use transport::{Transport, UreqTransport};
pub use types::{
    AuthToken, Credentials, PageRequest, Poll, PollDraft, PollOption, TokenResponse, VoteRequest,
};
