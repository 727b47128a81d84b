// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of the Epigraph analysis protocol.
//!
//! This crate implements [`AnalysisBackend`](epigraph_core::AnalysisBackend)
//! over HTTP, parses the line-delimited event stream, recovers from stream
//! failures through the non-streaming endpoint and coordinates submissions
//! and cancellation behind [`AnalysisController`].

pub mod client;
pub mod consumer;
pub mod controller;
pub mod sse;

pub use client::HttpBackend;
pub use consumer::{Outcome, ResultSource, StreamConsumer};
pub use controller::AnalysisController;
pub use sse::{parse_event_stream, EventStream, LineDecoder};
