// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Epigraph integration tests.
//!
//! Provides a scripted backend and an HTTP fixture server for fast,
//! deterministic, CI-runnable tests without a real analysis server.
//!
//! # Components
//!
//! - [`MockBackend`] - In-memory backend replaying queued stream and query scripts
//! - [`TestServer`] - wiremock server exposing the `/api` endpoints

pub mod mock_backend;
pub mod server;

pub use mock_backend::{Endpoint, MockBackend, StreamScript};
pub use server::{sse_body, TestServer};
