//! Authenticated request gateway.
//!
//! Wraps the HTTP client, attaches the bearer token to outgoing requests and
//! classifies responses into the failure taxonomy the rest of the client
//! reacts to. A 401/403 response fires the unauthorized hook exactly once
//! per failed call; the gateway itself never retries and never caches.

pub mod types;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::TokenCell;
use crate::config::Config;

/// Fallback when an error body carries no `message` field.
const GENERIC_SERVER_ERROR: &str = "Something went wrong. Please try again.";

/// Classified request failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401/403: the token is no longer valid. The session has already been
    /// torn down by the time this is returned.
    #[error("session expired")]
    Unauthorized,

    /// Any other 4xx/5xx, with the backend's `message` if it sent one.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// No response obtained (connectivity failure or timeout).
    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Returns the message a screen should surface to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired. Please login again.".to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => "Could not reach the server. Check connection.".to_string(),
        }
    }
}

type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Authenticated HTTP gateway to the backend.
pub struct Gateway {
    base_url: String,
    http: reqwest::Client,
    token: TokenCell,
    default_timeout: Option<Duration>,
    on_unauthorized: RwLock<Option<UnauthorizedHook>>,
}

impl Gateway {
    /// Creates a gateway reading the bearer token through `token`.
    pub fn new(base_url: impl Into<String>, token: TokenCell) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token,
            default_timeout: None,
            on_unauthorized: RwLock::new(None),
        }
    }

    /// Creates a gateway from config (base URL + default timeout).
    pub fn from_config(config: &Config, token: TokenCell) -> Self {
        let mut gateway = Self::new(config.effective_base_url(), token);
        gateway.default_timeout = config.request_timeout();
        gateway
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Installs the single subscription point for auth failures.
    ///
    /// The hook must not issue authenticated calls: it runs inside response
    /// classification and a recursive call would re-enter it.
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self
            .on_unauthorized
            .write()
            .expect("unauthorized hook lock poisoned") = Some(hook);
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// # Errors
    /// Returns the classified failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path, timeout);
        self.execute_json(request, path).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// Returns the classified failure.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path, timeout).json(body);
        self.execute_json(request, path).await
    }

    /// Builds a request with the bearer credential attached iff a token is
    /// present at call time.
    fn request(&self, method: Method, path: &str, timeout: Option<Duration>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url);

        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = timeout.or(self.default_timeout) {
            builder = builder.timeout(timeout);
        }
        builder
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed before a response was obtained");
            if e.is_timeout() {
                ApiError::Network("request timed out".to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let response = self.classify(response, path).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network(format!("invalid response body: {e}")))
    }

    /// Classifies a response, firing the unauthorized hook on 401/403.
    async fn classify(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            debug!(path, status = status.as_u16(), "request ok");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(path, status = status.as_u16(), "auth failure, tearing down session");
            self.fire_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        let message = extract_message(response).await;
        warn!(path, status = status.as_u16(), message, "server error");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn fire_unauthorized(&self) {
        let hook = self
            .on_unauthorized
            .read()
            .expect("unauthorized hook lock poisoned")
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

/// Pulls the `message` field out of an error body, with a generic fallback.
async fn extract_message(response: reqwest::Response) -> String {
    let body: Option<serde_json::Value> = response.json().await.ok();
    body.as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(std::string::ToString::to_string)
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}
