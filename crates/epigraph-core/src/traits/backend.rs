// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for the analysis service.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;

use crate::error::EpigraphError;
use crate::types::{AnalysisRequest, AnalysisResult, HealthReport};

/// Raw response body of the streaming endpoint, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, EpigraphError>> + Send>>;

/// Transport to the analysis service.
///
/// Implementations only move bytes and JSON. Event decoding, fallback and
/// cancellation live in the stream consumer.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Opens the streaming endpoint.
    ///
    /// Fails on connection errors and non-success statuses.
    async fn open_stream(&self, request: &AnalysisRequest) -> Result<ByteStream, EpigraphError>;

    /// Sends the request to the non-streaming endpoint and decodes its body.
    async fn query(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EpigraphError>;

    /// Fetches the service health report.
    async fn health(&self) -> Result<HealthReport, EpigraphError>;
}
