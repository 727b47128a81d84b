// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the stream consumer and its transports.

pub mod backend;

pub use backend::{AnalysisBackend, ByteStream};
