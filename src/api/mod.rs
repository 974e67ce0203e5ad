//! HTTP client for the library backend.
//!
//! One shared `reqwest::Client` with bearer-token injection and centralized
//! 401 handling: any unauthorized response evicts the stored credentials and
//! broadcasts the sign-out, no matter which endpoint made the call. Endpoint
//! groups live in the submodules as `impl ApiClient` blocks.

pub mod admin;
pub mod auth;
pub mod books;
pub mod circulation;
pub mod reservations;

use std::fmt;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::session::AuthSession;

#[derive(Debug)]
pub enum ApiError {
    /// The server rejected our credentials; the session has already been
    /// expired by the time this surfaces.
    Unauthorized,
    /// Non-2xx response. `message` carries the server's structured error
    /// text when the body had one.
    Api {
        status: u16,
        message: Option<String>,
    },
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The configured base URL is not usable.
    Config(String),
}

impl ApiError {
    /// The server's own message when present, else the caller's fallback.
    /// Error surfaces (bus + inline) must agree, so both go through here.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Session expired, please log in again"),
            ApiError::Api {
                status,
                message: Some(message),
            } => write!(f, "API error {}: {}", status, message),
            ApiError::Api {
                status,
                message: None,
            } => write!(f, "API error {}", status),
            ApiError::Http(e) => write!(f, "Request failed: {}", e),
            ApiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e)
    }
}

/// Envelope used by the auth and reservation endpoints.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: AuthSession,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: AuthSession) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    /// Attach the bearer token (when one is held), send, and apply the
    /// response policy shared by every endpoint.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Received 401, expiring session");
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| extract_error_message(&body));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.endpoint(path))).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.http.get(self.endpoint(path)).query(query))
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// POST whose response body we have no use for.
    pub(crate) async fn post(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        self.send(self.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    pub(crate) async fn put(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        self.send(self.http.put(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.delete(self.endpoint(path))).await?;
        Ok(())
    }
}

/// Servers in this family report failures as `{"error": …}` or
/// `{"message": …}`; prefer those over a canned string.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
