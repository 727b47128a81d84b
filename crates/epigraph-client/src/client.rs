// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport to the analysis backend.
//!
//! Provides [`HttpBackend`], which builds requests for the streaming,
//! fallback and health endpoints and maps transport failures into
//! [`EpigraphError`]s. It performs no retries: recovery is the stream
//! consumer's job.

use std::time::Duration;

use async_trait::async_trait;
use epigraph_config::model::BackendConfig;
use epigraph_core::{
    AnalysisBackend, AnalysisRequest, AnalysisResult, ByteStream, EpigraphError, HealthReport,
};
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

/// Streaming analysis endpoint, relative to the API root.
pub const STREAM_ENDPOINT: &str = "query-stream";
/// Non-streaming fallback endpoint.
pub const QUERY_ENDPOINT: &str = "query";
/// Health endpoint.
pub const HEALTH_ENDPOINT: &str = "health";

/// reqwest-backed [`AnalysisBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api_root: String,
}

impl HttpBackend {
    /// Creates a backend rooted at `api_root` (e.g. `http://127.0.0.1:5328/api`).
    pub fn new(
        api_root: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, EpigraphError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| EpigraphError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: api_root.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a backend from the `[backend]` configuration section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, EpigraphError> {
        Self::new(
            config.api_root(),
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// Full URL of an endpoint.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.api_root)
    }

    /// Sends `request` as JSON to `endpoint` and checks the status.
    async fn post(
        &self,
        endpoint: &str,
        request: &AnalysisRequest,
        accept: &'static str,
    ) -> Result<reqwest::Response, EpigraphError> {
        let url = self.endpoint(endpoint);
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .header(
                ACCEPT_LANGUAGE,
                HeaderValue::from_static(request.language.as_tag()),
            )
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        debug!(url = %url, status = %status, "backend responded");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(EpigraphError::Http {
                message: status_message(status, &body),
                status: Some(status.as_u16()),
                source: None,
            })
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn open_stream(&self, request: &AnalysisRequest) -> Result<ByteStream, EpigraphError> {
        let response = self
            .post(STREAM_ENDPOINT, request, "text/event-stream")
            .await?;

        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| EpigraphError::Stream(format!("failed to read stream: {e}")))
        });
        Ok(Box::pin(stream))
    }

    async fn query(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EpigraphError> {
        let response = self
            .post(QUERY_ENDPOINT, request, "application/json")
            .await?;

        let body = response.text().await.map_err(|e| EpigraphError::Http {
            message: format!("failed to read response body: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

        serde_json::from_str(&body).map_err(|e| EpigraphError::Decode {
            message: format!("failed to parse analysis result: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn health(&self) -> Result<HealthReport, EpigraphError> {
        let url = self.endpoint(HEALTH_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EpigraphError::Http {
                message: status_message(status, &body),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        response.json().await.map_err(|e| EpigraphError::Decode {
            message: format!("failed to parse health report: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> EpigraphError {
    EpigraphError::Http {
        message: format!("request to {url} failed: {e}"),
        status: None,
        source: Some(Box::new(e)),
    }
}

/// Prefers the backend's `{"error": "..."}` message over the raw body.
fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("backend returned {status}")
    } else {
        format!("backend returned {status}: {detail}")
    }
}
