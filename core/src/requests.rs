//! Pure request building for the poll API.
//!
//! # Design
//! `PollRequests` holds only a base URL. Each endpoint gets a `build_*`
//! method that returns an `HttpRequest` without touching the network, so the
//! wire shape of every call can be checked in isolation. `/login` is the one
//! form-encoded endpoint; every other body is JSON.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{AuthToken, Credentials, PageRequest, PollDraft, VoteRequest};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Stateless request builder for the poll API.
#[derive(Debug, Clone)]
pub struct PollRequests {
    base_url: String,
}

impl PollRequests {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/register", None, credentials)
    }

    pub fn build_login(&self, credentials: &Credentials) -> HttpRequest {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &credentials.username)
            .append_pair("password", &credentials.password)
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: self.url("/login"),
            headers: vec![content_type(FORM)],
            body: Some(body),
        }
    }

    pub fn build_cast_vote(&self, vote: &VoteRequest, token: &AuthToken) -> Result<HttpRequest, ApiError> {
        let path = format!("/polls/{}/vote", vote.poll_id);
        self.json(HttpMethod::Post, &path, Some(token), vote)
    }

    pub fn build_poll_results(&self, poll_id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/polls/{poll_id}/results"), None)
    }

    pub fn build_list_polls(&self, page: &PageRequest) -> HttpRequest {
        let path = format!("/polls?skip={}&limit={}", page.skip, page.limit);
        self.bare(HttpMethod::Get, &path, None)
    }

    pub fn build_create_poll(&self, draft: &PollDraft, token: &AuthToken) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/polls", Some(token), draft)
    }

    pub fn build_get_poll(&self, poll_id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/polls/{poll_id}"), None)
    }

    pub fn build_delete_poll(&self, poll_id: i64, token: &AuthToken) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/polls/{poll_id}"), Some(token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bare(&self, method: HttpMethod, path: &str, token: Option<&AuthToken>) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: token.map(authorization).into_iter().collect(),
            body: None,
        }
    }

    fn json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&AuthToken>,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Serialization)?;
        let mut headers: Vec<_> = token.map(authorization).into_iter().collect();
        headers.push(content_type(JSON));
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers,
            body: Some(body),
        })
    }
}

fn authorization(token: &AuthToken) -> (String, String) {
    ("authorization".to_string(), token.bearer())
}

fn content_type(value: &str) -> (String, String) {
    ("content-type".to_string(), value.to_string())
}
