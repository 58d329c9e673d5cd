//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. `PollServiceClient` is generic
//! over it, so tests can swap in a recording fake. `UreqTransport` is the
//! blocking default: HTTP error statuses come back as data, and only a
//! refused connection is reported as `TransportError::ConnectionRefused`.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs exactly one HTTP round-trip per call.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent pools connections internally; the transport itself holds no
/// per-call state and is safe to share across threads.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(&request.url), &request.headers).call()
            }
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&request.url), &request.headers).send_empty()
            }
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // No size cap: the caller gets the whole body, as sent.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Split ureq failures into "host unreachable" and everything else.
fn classify(err: ureq::Error) -> TransportError {
    match &err {
        ureq::Error::Io(io_err) if io_err.kind() == io::ErrorKind::ConnectionRefused => {
            TransportError::ConnectionRefused(err.to_string())
        }
        ureq::Error::ConnectionFailed => TransportError::ConnectionRefused(err.to_string()),
        _ => TransportError::Other(err.to_string()),
    }
}
