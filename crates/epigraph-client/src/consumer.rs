// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives one analysis from request to result.
//!
//! [`StreamConsumer::run`] opens the streaming endpoint, forwards every
//! decoded event to the caller and stops at the first terminal event. When
//! streaming fails before a terminal event, the identical request is sent
//! once to the non-streaming endpoint. When that fails too, a localized
//! degraded result is produced. Every path yields exactly one [`Outcome`].

use std::sync::Arc;

use epigraph_core::{AnalysisBackend, AnalysisRequest, AnalysisResult, EpigraphError, StreamEvent};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::sse::parse_event_stream;

/// Where a completed result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// A `final_results` event on the stream.
    Streamed,
    /// An `error` event on the stream, rendered as a result.
    ServerError,
    /// The non-streaming endpoint after the stream failed.
    Fallback,
    /// Locally built after both endpoints failed.
    Degraded,
}

/// Terminal outcome of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed {
        result: AnalysisResult,
        source: ResultSource,
    },
    /// The run was cancelled; no result was produced.
    Cancelled,
}

impl Outcome {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Outcome::Completed { result, .. } => Some(result),
            Outcome::Cancelled => None,
        }
    }
}

/// Streaming analysis with non-streaming fallback.
#[derive(Clone)]
pub struct StreamConsumer {
    backend: Arc<dyn AnalysisBackend>,
}

impl StreamConsumer {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    /// Runs `request` to completion, calling `on_event` for each decoded event.
    ///
    /// Cancellation is checked before every suspension point and before each
    /// event is delivered, so once `cancel` fires `on_event` is not called
    /// again and the run resolves to [`Outcome::Cancelled`].
    pub async fn run<F>(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> Outcome
    where
        F: FnMut(&StreamEvent) + Send,
    {
        match self.stream(request, cancel, &mut on_event).await {
            Ok(outcome) => outcome,
            Err(_) if cancel.is_cancelled() => {
                info!("analysis cancelled");
                Outcome::Cancelled
            }
            Err(e) if e.is_cancelled() => Outcome::Cancelled,
            Err(e) => {
                warn!(error = %e, "streaming analysis failed, trying non-streaming endpoint");
                self.fallback(request, cancel, e).await
            }
        }
    }

    async fn stream<F>(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
        on_event: &mut F,
    ) -> Result<Outcome, EpigraphError>
    where
        F: FnMut(&StreamEvent) + Send,
    {
        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EpigraphError::Cancelled),
            opened = self.backend.open_stream(request) => opened?,
        };
        let mut events = parse_event_stream(bytes);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(EpigraphError::Cancelled),
                next = events.next() => next,
            };

            let event = match next {
                Some(event) => event?,
                None => {
                    return Err(EpigraphError::Stream(
                        "stream ended without final results".to_string(),
                    ));
                }
            };

            if cancel.is_cancelled() {
                return Err(EpigraphError::Cancelled);
            }

            debug!(kind = event.kind(), "stream event");
            on_event(&event);

            match event {
                StreamEvent::FinalResults { results } => {
                    info!(tabs = results.tabs.len(), "analysis complete");
                    return Ok(Outcome::Completed {
                        result: results,
                        source: ResultSource::Streamed,
                    });
                }
                StreamEvent::Error { message } => {
                    warn!(message = %message, "backend reported an analysis error");
                    return Ok(Outcome::Completed {
                        result: AnalysisResult::server_error(&message, request.language),
                        source: ResultSource::ServerError,
                    });
                }
                _ => {}
            }
        }
    }

    async fn fallback(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
        cause: EpigraphError,
    ) -> Outcome {
        let attempt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Outcome::Cancelled,
            attempt = self.backend.query(request) => attempt,
        };

        match attempt {
            Ok(result) => {
                info!("non-streaming analysis succeeded");
                Outcome::Completed {
                    result,
                    source: ResultSource::Fallback,
                }
            }
            Err(_) if cancel.is_cancelled() => Outcome::Cancelled,
            Err(e) => {
                error!(stream_error = %cause, fallback_error = %e, "analysis failed on both endpoints");
                Outcome::Completed {
                    result: AnalysisResult::failure(&cause.to_string(), request.language),
                    source: ResultSource::Degraded,
                }
            }
        }
    }
}
