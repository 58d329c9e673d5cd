//! Request inputs and response DTOs for the poll API.
//!
//! # Design
//! Inputs (`Credentials`, `PollDraft`, `VoteRequest`, `PageRequest`) are what
//! the request builders consume. Response shapes (`Poll`, `TokenResponse`)
//! are defined independently of the mock server and are only used by callers
//! that choose to parse a body; the client itself passes bodies through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username and password, supplied per call and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Opaque bearer token issued by `/login`. The caller owns its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TokenResponse> for AuthToken {
    fn from(resp: TokenResponse) -> Self {
        Self(resp.access_token)
    }
}

/// Payload for `POST /polls`. Option count is not checked locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

impl PollDraft {
    pub fn new<I, S>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A vote for one option of one poll. Only `option_id` goes in the body;
/// `poll_id` is part of the path.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VoteRequest {
    #[serde(skip)]
    pub poll_id: i64,
    pub option_id: i64,
}

/// Pagination for `GET /polls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { skip: 0, limit: 10 }
    }
}

/// Body of a successful `/login` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A poll as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub vote_count: u64,
}
