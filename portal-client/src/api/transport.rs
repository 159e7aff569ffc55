use async_trait::async_trait;
use http::{Method, StatusCode};
use portal_core::observability::{extract_request_id, inject_trace_headers};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use super::error::TransportFailure;
use super::request::ApiRequest;

/// A single wire attempt: the logical request plus the bearer chosen for it.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub timeout: Option<Duration>,
}

impl OutgoingRequest {
    pub fn from_api(request: &ApiRequest, bearer: Option<String>) -> Self {
        Self {
            method: request.method.clone(),
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer,
            timeout: request.options.timeout,
        }
    }
}

/// Everything the classifier needs from a response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// `x-request-id` echoed by the server, if any.
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: OutgoingRequest) -> Result<RawResponse, TransportFailure>;
}

/// Production transport over reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportFailure::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: OutgoingRequest) -> Result<RawResponse, TransportFailure> {
        let url = self.url(&request.path);
        let request_id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some(&request_id));

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(method = %request.method, url = %url, request_id = %request_id, error = %e, "HTTP request failed");
            map_reqwest_error(&e)
        })?;

        let status = response.status();
        let echoed = extract_request_id(response.headers());
        let body = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

        Ok(RawResponse {
            status,
            request_id: echoed,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::timeout(err.to_string())
    } else {
        TransportFailure::network(err.to_string())
    }
}
