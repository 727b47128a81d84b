// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Epigraph inscription-analysis client.
//!
//! This crate provides the error type, the wire and domain types, the pure
//! progress projection, the application state container and the backend
//! trait used throughout the workspace.

pub mod error;
pub mod event;
pub mod i18n;
pub mod input;
pub mod progress;
pub mod state;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EpigraphError;
pub use event::{decode_line, EventDecodeError, StreamEvent};
pub use input::{InputKind, InputPayload};
pub use progress::{ProgressState, Stage};
pub use state::{Action, AppState, Page};
pub use traits::{AnalysisBackend, ByteStream};
pub use types::{
    AnalysisRequest, AnalysisResult, HealthReport, Locale, Preferences, Preprocessing, ResultTab,
};
