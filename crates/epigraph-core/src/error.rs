// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Epigraph client.

use thiserror::Error;

/// The primary error type used across the backend trait, the stream consumer
/// and the command-line surface.
#[derive(Debug, Error)]
pub enum EpigraphError {
    /// Configuration errors (invalid URL, bad header value, client construction).
    #[error("configuration error: {0}")]
    Config(String),

    /// The submitted material cannot be analyzed (empty text, unreadable file).
    #[error("invalid input: {0}")]
    Input(String),

    /// HTTP-level failures: connection errors and non-success statuses.
    #[error("http error: {message}")]
    Http {
        message: String,
        /// Response status, when the server answered at all.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The event stream broke or ended before a terminal event arrived.
    #[error("stream error: {0}")]
    Stream(String),

    /// A response body or event payload could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EpigraphError {
    /// True when the error is a caller-initiated cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EpigraphError::Cancelled)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            EpigraphError::Http { status, .. } => *status,
            _ => None,
        }
    }
}
