//! Outbound HTTP client for the upstream service.
//!
//! One `reqwest::Client` is built at startup and shared by every request.
//! The upstream host is read from the environment on every call, so an
//! operator can repoint the relay without a restart.

use std::time::Duration;

use http::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::{UpstreamConfig, REQUEST_ID_HEADER};

/// A decoded JSON object, key order and number text preserved as received.
pub type JsonObject = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream host variable {var} is not set")]
    HostUnset { var: String },

    #[error("Upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream responded with status {0}")]
    Status(StatusCode),

    #[error("Upstream body is not a JSON object: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the single upstream endpoint.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Fails only at startup, when the TLS backend cannot be initialised.
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .no_proxy()
            .build()?;

        Ok(Self { http, config })
    }

    /// Build the upstream URL from the current value of the host variable.
    pub fn resolve_url(&self) -> Result<String, UpstreamError> {
        let host = std::env::var(&self.config.host_env)
            .ok()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UpstreamError::HostUnset {
                var: self.config.host_env.clone(),
            })?;

        // Bare IPv6 literals need brackets inside a URL authority
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host
        };

        Ok(format!("http://{}:{}{}", host, self.config.port, self.config.path))
    }

    /// GET the upstream endpoint and decode its body as a JSON object.
    ///
    /// Fails on transport errors, timeouts, non-2xx statuses, and bodies that
    /// are not a JSON object (arrays and scalars included).
    pub async fn fetch_json(&self, request_id: Option<Uuid>) -> Result<JsonObject, UpstreamError> {
        let url = self.resolve_url()?;
        tracing::debug!(%url, "Calling upstream");

        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(id) = request_id {
            request = request.header(REQUEST_ID_HEADER, id.to_string());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let object: JsonObject = serde_json::from_slice(&body)?;

        tracing::debug!(
            %status,
            bytes = body.len(),
            fields = object.len(),
            "Upstream responded"
        );

        Ok(object)
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.config.timeout)
        } else {
            UpstreamError::Request(err)
        }
    }
}
