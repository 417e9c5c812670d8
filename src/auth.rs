//! Client side of the browser login handshake with the Lane backend.
//!
//! The CLI asks the backend for a one-time code, sends the user to a page
//! carrying that code, and then polls the backend with the same code until
//! the page has been completed.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AuthError, PollError};
use crate::wire::null_as_default;

/// Body returned by both the session and the poll endpoint. Every field is
/// optional; `null` and an empty string count as absent.
#[derive(Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(default)]
pub struct AuthResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
}

impl AuthResponse {
    pub fn outcome(self) -> PollOutcome {
        if !self.token.is_empty() {
            PollOutcome::Success(self.token)
        } else if !self.error.is_empty() {
            PollOutcome::Failure(self.error)
        } else {
            PollOutcome::Pending
        }
    }
}

/// What a single decoded poll response means for the login attempt.
#[derive(Debug, PartialEq, Clone)]
pub enum PollOutcome {
    Pending,
    Success(String),
    Failure(String),
}

/// A pending login. The code is a capability for the rest of the flow.
#[derive(Debug, PartialEq, Clone)]
pub struct AuthSession {
    pub code: String,
}

pub trait AuthBackend {
    fn start_session(&self) -> Result<AuthSession, AuthError>;

    /// One poll request. Errors are transient from the caller's view.
    fn check(&self, session: &AuthSession) -> Result<AuthResponse, PollError>;

    /// Page the user completes the login on.
    fn login_url(&self, session: &AuthSession) -> String;
}

pub struct HttpAuthBackend {
    api_url: String,
    http_client: Client,
}

impl HttpAuthBackend {
    pub fn new(
        api_url: &str,
        request_timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(request_timeout)
            .user_agent(crate::api::USER_AGENT)
            .build()
            .map_err(|source| AuthError::Connection { source })?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn session_url(&self) -> String {
        format!("{}/api/auth/cli", self.api_url)
    }
}

impl AuthBackend for HttpAuthBackend {
    fn start_session(&self) -> Result<AuthSession, AuthError> {
        let url = self.session_url();
        debug!(%url, "creating auth session");

        let response = self
            .http_client
            .post(&url)
            .send()
            .map_err(|source| AuthError::Connection { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::BadStatus { status });
        }

        let body = response
            .text()
            .map_err(|source| AuthError::Connection { source })?;
        let auth: AuthResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Protocol {
                reason: format!("failed to parse response: {}", e),
            })?;

        if auth.code.is_empty() {
            let reason = if auth.error.is_empty() {
                "no auth code received".to_string()
            } else {
                auth.error
            };
            return Err(AuthError::Protocol { reason });
        }

        Ok(AuthSession { code: auth.code })
    }

    fn check(&self, session: &AuthSession) -> Result<AuthResponse, PollError> {
        let url = format!("{}?code={}", self.session_url(), session.code);

        let body = self
            .http_client
            .get(&url)
            .send()
            .and_then(|response| response.text())
            .map_err(|source| PollError::Transport { source })?;

        serde_json::from_str(&body).map_err(|source| PollError::Decode { source })
    }

    fn login_url(&self, session: &AuthSession) -> String {
        format!("{}/auth/cli?code={}", self.api_url, session.code)
    }
}
