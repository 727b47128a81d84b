// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted in-memory analysis backend for deterministic testing.
//!
//! `MockBackend` implements `AnalysisBackend` from per-call scripts, so
//! stream splits, stalls, transport failures and fallback responses can be
//! reproduced without a network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use epigraph_core::{
    AnalysisBackend, AnalysisRequest, AnalysisResult, ByteStream, EpigraphError, HealthReport,
};

/// Which backend operation a recorded request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stream,
    Query,
}

/// Behavior of one `open_stream` call.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// Yield each chunk, then end.
    Chunks(Vec<String>),
    /// Yield each chunk, then never produce another item.
    ChunksThenStall(Vec<String>),
    /// Yield each chunk, then fail with a stream error.
    ChunksThenError(Vec<String>, String),
    /// Refuse to open with the given HTTP status.
    FailOpen(u16),
}

impl StreamScript {
    pub fn chunks(chunks: impl IntoIterator<Item = String>) -> Self {
        Self::Chunks(chunks.into_iter().collect())
    }

    pub fn chunks_then_stall(chunks: impl IntoIterator<Item = String>) -> Self {
        Self::ChunksThenStall(chunks.into_iter().collect())
    }

    pub fn chunks_then_error(chunks: impl IntoIterator<Item = String>, message: &str) -> Self {
        Self::ChunksThenError(chunks.into_iter().collect(), message.to_string())
    }

    /// Opens successfully but never yields.
    pub fn stall() -> Self {
        Self::ChunksThenStall(Vec::new())
    }

    pub fn fail_open(status: u16) -> Self {
        Self::FailOpen(status)
    }
}

/// A mock backend driven by queued scripts.
///
/// Scripts are popped in FIFO order per endpoint. When a queue is empty the
/// stream fails to open with 503 and the fallback query fails with 503.
pub struct MockBackend {
    streams: Arc<Mutex<VecDeque<StreamScript>>>,
    queries: Arc<Mutex<VecDeque<Result<AnalysisResult, u16>>>>,
    requests: Arc<Mutex<Vec<(Endpoint, AnalysisRequest)>>>,
    health: Arc<Mutex<HealthReport>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            streams: Arc::new(Mutex::new(VecDeque::new())),
            queries: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            health: Arc::new(Mutex::new(HealthReport {
                status: "healthy".to_string(),
                active_requests: Some(0),
                server: Some("mock".to_string()),
            })),
        }
    }

    pub async fn push_stream(&self, script: StreamScript) {
        self.streams.lock().await.push_back(script);
    }

    /// Queues a fallback response; `Err(status)` fails with that HTTP status.
    pub async fn push_query(&self, response: Result<AnalysisResult, u16>) {
        self.queries.lock().await.push_back(response);
    }

    pub async fn set_health(&self, report: HealthReport) {
        *self.health.lock().await = report;
    }

    /// Every request received, in arrival order.
    pub async fn requests(&self) -> Vec<(Endpoint, AnalysisRequest)> {
        self.requests.lock().await.clone()
    }

    pub async fn query_calls(&self) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|(endpoint, _)| *endpoint == Endpoint::Query)
            .count()
    }

    async fn record(&self, endpoint: Endpoint, request: &AnalysisRequest) {
        self.requests.lock().await.push((endpoint, request.clone()));
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn status_error(status: u16) -> EpigraphError {
    EpigraphError::Http {
        message: format!("backend returned {status}"),
        status: Some(status),
        source: None,
    }
}

fn chunk_stream(chunks: Vec<String>) -> impl futures::Stream<Item = Result<Bytes, EpigraphError>> {
    stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c))))
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn open_stream(&self, request: &AnalysisRequest) -> Result<ByteStream, EpigraphError> {
        self.record(Endpoint::Stream, request).await;
        let script = self
            .streams
            .lock()
            .await
            .pop_front()
            .unwrap_or(StreamScript::FailOpen(503));

        match script {
            StreamScript::Chunks(chunks) => Ok(Box::pin(chunk_stream(chunks))),
            StreamScript::ChunksThenStall(chunks) => {
                Ok(Box::pin(chunk_stream(chunks).chain(stream::pending())))
            }
            StreamScript::ChunksThenError(chunks, message) => Ok(Box::pin(
                chunk_stream(chunks).chain(stream::once(async move {
                    Err(EpigraphError::Stream(message))
                })),
            )),
            StreamScript::FailOpen(status) => Err(status_error(status)),
        }
    }

    async fn query(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EpigraphError> {
        self.record(Endpoint::Query, request).await;
        self.queries
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(503))
            .map_err(status_error)
    }

    async fn health(&self) -> Result<HealthReport, EpigraphError> {
        Ok(self.health.lock().await.clone())
    }
}
