//! API call wrapper for the rentals backend.
//!
//! # Design
//! `ApiClient` splits every call into the same three steps. `build_request`
//! converts the outbound body to snake_case and attaches the bearer token.
//! The `Transport` executes the round-trip. `parse_response` unwraps the
//! envelope, converts inbound data to camelCase and normalizes failures
//! into `ApiError`. The two outer steps are pure and can be exercised
//! without any I/O; `call` strings them together and starts session
//! recovery when the backend answers 401.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::case::{to_camel, to_snake, Tree};
use crate::envelope::{classify, Outcome};
use crate::error::{ApiError, REQUEST_FAILED_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::recovery::SessionRecovery;
use crate::session::TokenStore;
use crate::transport::Transport;

/// A call as the caller describes it, with camelCase keys in `body`.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Tree>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>, body: Tree) -> Self {
        Self::new(HttpMethod::Post, url).with_body(body)
    }

    pub fn put(url: impl Into<String>, body: Tree) -> Self {
        Self::new(HttpMethod::Put, url).with_body(body)
    }

    pub fn patch(url: impl Into<String>, body: Tree) -> Self {
        Self::new(HttpMethod::Patch, url).with_body(body)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    #[must_use]
    pub fn with_body(mut self, body: Tree) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }
}

/// Unwrapped successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: Option<String>,
}

/// Client for the rentals backend. Clones share transport, token storage
/// and recovery.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    recovery: Arc<SessionRecovery>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore, recovery: Arc<SessionRecovery>) -> Self {
        Self {
            transport,
            tokens,
            recovery,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Issue `spec` and decode the envelope's `data` into `T`.
    pub async fn call<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<ApiResponse<T>, ApiError> {
        let request = self.build_request(&spec)?;
        debug!(method = request.method.as_str(), url = %request.path, "dispatching request");

        let response = self.transport.execute(request).await.map_err(ApiError::from)?;
        debug!(status = response.status, url = %spec.url, "response received");

        // Read the location before recovery can navigate away from it.
        let session_expired = response.status == 401 && !self.recovery.on_login_section();
        if response.status == 401 {
            // Detached; the rejection below does not wait for it.
            let _ = self.recovery.spawn();
        }
        self.parse_response(response).map_err(|error| {
            if session_expired {
                error.into_session_expired()
            } else {
                error
            }
        })
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
        let body = spec
            .body
            .as_ref()
            .map(|tree| serde_json::to_string(&to_snake(tree)))
            .transpose()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(token) = self.tokens.get() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers.extend(spec.headers.iter().cloned());

        Ok(HttpRequest {
            method: spec.method,
            path: spec.url.clone(),
            headers,
            query: spec.query.clone(),
            body,
        })
    }

    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status;
        let (raw, outcome) = classify(&response.body);

        if !response.is_success() {
            return Err(failure(status, raw, outcome));
        }

        match outcome {
            Outcome::Success { data, message } => {
                let data = to_camel(&Tree::from(data)).into_value();
                match serde_json::from_value(data) {
                    Ok(data) => Ok(ApiResponse { data, message }),
                    Err(e) => Err(ApiError::Decode {
                        message: e.to_string(),
                        status,
                        data: raw,
                    }),
                }
            }
            other => Err(failure(status, raw, other)),
        }
    }
}

/// Normalize a response that did not yield data.
fn failure(status: u16, raw: serde_json::Value, outcome: Outcome) -> ApiError {
    let fallback = || {
        if (200..300).contains(&status) {
            REQUEST_FAILED_MESSAGE.to_string()
        } else {
            format!("Request failed with status code {status}")
        }
    };

    match outcome {
        Outcome::Failed { message } => ApiError::Envelope {
            message: message.unwrap_or_else(fallback),
            status,
            data: raw,
            session_expired: false,
        },
        Outcome::Success { .. } | Outcome::Malformed => ApiError::Malformed {
            message: fallback(),
            status,
            data: raw,
            session_expired: false,
        },
    }
}
