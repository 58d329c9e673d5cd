//! One method per poll service endpoint.
//!
//! # Design
//! `PollServiceClient` pairs a `PollRequests` builder with a `Transport`.
//! Each method builds one request, executes it once and hands the response
//! back untouched. The status code is never inspected here. A refused
//! connection is logged and surfaces as `Ok(None)`; any other transport
//! fault is an `ApiError::Transport`. Nothing is retried.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::requests::PollRequests;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthToken, Credentials, PageRequest, PollDraft, VoteRequest};

/// `Ok(Some(_))` for any HTTP response, `Ok(None)` when the host refused
/// the connection.
pub type ApiResult = Result<Option<HttpResponse>, ApiError>;

/// Client for the remote poll service.
///
/// Holds no mutable state, so one instance can be shared between threads
/// whenever the transport can.
#[derive(Debug, Clone)]
pub struct PollServiceClient<T = UreqTransport> {
    requests: PollRequests,
    transport: T,
}

impl PollServiceClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> PollServiceClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            requests: PollRequests::new(&config.base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    /// `POST /register` with a JSON body.
    pub fn register_user(&self, username: &str, password: &str) -> ApiResult {
        let request = self
            .requests
            .build_register(&Credentials::new(username, password))?;
        self.send(request)
    }

    /// `POST /login` with a form-encoded body. A 200 body carries
    /// `access_token`; see `TokenResponse`.
    pub fn login(&self, username: &str, password: &str) -> ApiResult {
        self.send(self.requests.build_login(&Credentials::new(username, password)))
    }

    pub fn cast_vote(&self, poll_id: i64, option_id: i64, token: &AuthToken) -> ApiResult {
        let vote = VoteRequest { poll_id, option_id };
        let request = self.requests.build_cast_vote(&vote, token)?;
        self.send(request)
    }

    pub fn get_poll_results(&self, poll_id: i64) -> ApiResult {
        self.send(self.requests.build_poll_results(poll_id))
    }

    /// First page of polls: `skip=0`, `limit=10`.
    pub fn list_polls(&self) -> ApiResult {
        self.list_polls_page(PageRequest::default())
    }

    pub fn list_polls_page(&self, page: PageRequest) -> ApiResult {
        self.send(self.requests.build_list_polls(&page))
    }

    pub fn create_poll<I, S>(&self, question: &str, options: I, token: &AuthToken) -> ApiResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let draft = PollDraft::new(question, options);
        let request = self.requests.build_create_poll(&draft, token)?;
        self.send(request)
    }

    pub fn get_poll(&self, poll_id: i64) -> ApiResult {
        self.send(self.requests.build_get_poll(poll_id))
    }

    pub fn delete_poll(&self, poll_id: i64, token: &AuthToken) -> ApiResult {
        self.send(self.requests.build_delete_poll(poll_id, token))
    }

    fn send(&self, request: HttpRequest) -> ApiResult {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "received response");
                Ok(Some(response))
            }
            Err(TransportError::ConnectionRefused(reason)) => {
                warn!(url = %request.url, %reason, "connection error");
                Ok(None)
            }
            Err(TransportError::Other(reason)) => Err(ApiError::Transport(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Records every request and answers with a canned outcome.
    struct FakeTransport {
        outcome: Result<HttpResponse, TransportError>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn responding(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.as_bytes().to_vec(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                outcome: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.outcome.clone()
        }
    }

    fn client(transport: &FakeTransport) -> PollServiceClient<&FakeTransport> {
        PollServiceClient::with_transport(&ClientConfig::new("http://poll.test"), transport)
    }

    fn token() -> AuthToken {
        AuthToken::new("T")
    }

    /// Every operation, run once against the given client.
    fn every_operation(c: &PollServiceClient<&FakeTransport>) -> Vec<ApiResult> {
        vec![
            c.register_user("alice", "pw1"),
            c.login("alice", "pw1"),
            c.cast_vote(7, 1, &token()),
            c.get_poll_results(7),
            c.list_polls(),
            c.create_poll("Color?", ["Red", "Blue"], &token()),
            c.get_poll(7),
            c.delete_poll(7, &token()),
        ]
    }

    #[test]
    fn each_call_issues_exactly_one_request() {
        let transport = FakeTransport::responding(200, "{}");
        let c = client(&transport);

        c.register_user("alice", "pw1").unwrap();
        assert_eq!(transport.requests().len(), 1);

        let results = every_operation(&c);
        assert_eq!(results.len(), 8);
        assert_eq!(transport.requests().len(), 9);
    }

    #[test]
    fn register_sends_credentials_verbatim() {
        let transport = FakeTransport::responding(200, "{}");
        client(&transport).register_user("alice", "pw1").unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, "http://poll.test/register");
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "username": "alice", "password": "pw1" }));
    }

    #[test]
    fn login_sends_form_body() {
        let transport = FakeTransport::responding(200, r#"{"access_token":"T"}"#);
        client(&transport).login("alice", "pw1").unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://poll.test/login");
        assert_eq!(sent[0].body.as_deref(), Some("username=alice&password=pw1"));
        assert!(serde_json::from_str::<serde_json::Value>(sent[0].body.as_deref().unwrap()).is_err());
    }

    #[test]
    fn cast_vote_sets_bearer_header_and_path() {
        let transport = FakeTransport::responding(200, "{}");
        client(&transport).cast_vote(7, 3, &token()).unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://poll.test/polls/7/vote");
        assert!(sent[0]
            .headers
            .contains(&("authorization".to_string(), "Bearer T".to_string())));
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"option_id":3}"#));
    }

    #[test]
    fn list_polls_defaults_page() {
        let transport = FakeTransport::responding(200, "[]");
        let c = client(&transport);
        c.list_polls().unwrap();
        c.list_polls_page(PageRequest { skip: 10, limit: 10 }).unwrap();

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://poll.test/polls?skip=0&limit=10",
                "http://poll.test/polls?skip=10&limit=10",
            ]
        );
    }

    #[test]
    fn error_statuses_pass_through_unchanged() {
        for status in [400, 401, 404, 500] {
            let transport = FakeTransport::responding(status, r#"{"detail":"nope"}"#);
            for result in every_operation(&client(&transport)) {
                let response = result.unwrap().expect("response should be present");
                assert_eq!(response.status, status);
                assert_eq!(response.body, br#"{"detail":"nope"}"#);
            }
        }
    }

    #[test]
    fn no_content_passes_through() {
        let transport = FakeTransport::responding(204, "");
        let response = client(&transport).delete_poll(7, &token()).unwrap().unwrap();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    #[test]
    fn connection_refused_yields_none_for_every_operation() {
        let transport = FakeTransport::failing(TransportError::ConnectionRefused("refused".into()));
        for result in every_operation(&client(&transport)) {
            assert!(matches!(result, Ok(None)));
        }
        assert_eq!(transport.requests().len(), 8, "no retries after refusal");
    }

    #[test]
    fn other_transport_faults_propagate() {
        let transport = FakeTransport::failing(TransportError::Other("tls handshake".into()));
        for result in every_operation(&client(&transport)) {
            let err = result.unwrap_err();
            assert!(matches!(err, ApiError::Transport(ref msg) if msg == "tls handshake"));
        }
    }
}
