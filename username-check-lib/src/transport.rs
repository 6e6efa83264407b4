//! HTTP transport used by the checker and the notifier.
//!
//! The [`Transport`] trait is the seam between check logic and the network.
//! [`HttpTransport`] is the reqwest-backed implementation; tests supply a
//! scripted one.

use crate::error::UsernameCheckError;
use async_trait::async_trait;
use std::time::Duration;

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new<B: Into<String>>(status: u16, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and read the whole body.
    ///
    /// Any HTTP status is a successful transport result; only failures to
    /// get a response at all are errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, UsernameCheckError>;

    /// POST a JSON payload and read the response.
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<HttpResponse, UsernameCheckError>;
}

/// reqwest-backed transport with a fixed per-request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, UsernameCheckError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("username-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                UsernameCheckError::network_with_source(
                    "Failed to create HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    fn map_error(&self, operation: &str, err: reqwest::Error) -> UsernameCheckError {
        if err.is_timeout() {
            UsernameCheckError::timeout(operation, self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, UsernameCheckError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error("GET request", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_error("reading response body", e))?;

        Ok(HttpResponse { status, body })
    }

    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<HttpResponse, UsernameCheckError> {
        let response = self
            .http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_error("webhook POST", e))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
