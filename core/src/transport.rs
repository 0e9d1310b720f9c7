//! The seam between `ApiClient` and the network.
//!
//! # Design
//! `Transport` takes a fully built `HttpRequest` and hands back whatever the
//! server answered, error statuses included. Only failures that produced no
//! response at all are `Err`. `UreqTransport` is the production
//! implementation; it runs ureq's blocking call on tokio's blocking pool so
//! async callers are never stalled.

use async_trait::async_trait;
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a ureq agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Agent that returns 4xx/5xx responses as data rather than `Err`, so
    /// status interpretation stays with `ApiClient`.
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::new(e.to_string()))?
    }
}

fn execute_blocking(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        path,
        headers,
        query,
        body,
    } = request;

    let result = match (method, body) {
        (HttpMethod::Get, _) => decorate(agent.get(&path), &headers, &query).call(),
        (HttpMethod::Delete, _) => decorate(agent.delete(&path), &headers, &query).call(),
        (HttpMethod::Post, Some(body)) => decorate(agent.post(&path), &headers, &query).send(body.as_bytes()),
        (HttpMethod::Post, None) => decorate(agent.post(&path), &headers, &query).send_empty(),
        (HttpMethod::Put, Some(body)) => decorate(agent.put(&path), &headers, &query).send(body.as_bytes()),
        (HttpMethod::Put, None) => decorate(agent.put(&path), &headers, &query).send_empty(),
        (HttpMethod::Patch, Some(body)) => decorate(agent.patch(&path), &headers, &query).send(body.as_bytes()),
        (HttpMethod::Patch, None) => decorate(agent.patch(&path), &headers, &query).send_empty(),
    };
    let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    // Bodies over ureq's read limit fail here rather than arriving truncated.
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?;

    Ok(HttpResponse { status, body })
}

fn decorate<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
    query: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in query {
        builder = builder.query(name, value);
    }
    builder
}
