// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! wiremock fixtures that impersonate the analysis server over HTTP.

use epigraph_core::{AnalysisResult, StreamEvent};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders events the way the server writes them: one `data: ` line each,
/// separated by blank lines.
pub fn sse_body(events: &[StreamEvent]) -> String {
    events
        .iter()
        .map(|event| {
            let json = serde_json::to_string(event).unwrap_or_default();
            format!("data: {json}\n\n")
        })
        .collect()
}

/// A running mock server with the API mounted under `/api`.
pub struct TestServer {
    pub server: MockServer,
}

impl TestServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure as `backend.base_url`.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// API root as passed to the HTTP backend.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// Streams `body` from `/api/query-stream`.
    pub async fn mount_stream(&self, body: String) {
        Mock::given(method("POST"))
            .and(path("/api/query-stream"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&self.server)
            .await;
    }

    /// Fails `/api/query-stream` with `status`.
    pub async fn mount_stream_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/query-stream"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answers `/api/query` with `result`.
    pub async fn mount_query(&self, result: &AnalysisResult) {
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(result))
            .mount(&self.server)
            .await;
    }

    /// Fails `/api/query` with `status` and a JSON error body.
    pub async fn mount_query_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"error": "analysis unavailable"})),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_health(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received on `endpoint` (e.g. `/api/query`).
    pub async fn request_bodies(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
