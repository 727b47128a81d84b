// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the backend trait, the stream consumer and the CLI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::i18n::{self, Message};

/// Supported UI and output languages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// Hebrew. The backend's default language.
    #[default]
    He,
    /// English.
    En,
}

impl Locale {
    /// Value sent in the `Accept-Language` header and the `language` field.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::He => "he",
            Locale::En => "en",
        }
    }
}

/// Analysis preferences sent alongside the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub output_language: Locale,
    pub detailed_analysis: bool,
    pub quick_preview: bool,
}

impl Preferences {
    pub fn new(locale: Locale) -> Self {
        Self {
            output_language: locale,
            detailed_analysis: true,
            quick_preview: true,
        }
    }
}

/// Request body shared by the streaming and the fallback endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub input_data: crate::input::InputPayload,
    pub language: Locale,
    pub preferences: Preferences,
}

impl AnalysisRequest {
    /// Builds a request with default preferences for the given locale.
    pub fn new(input: crate::input::InputPayload, locale: Locale) -> Self {
        Self {
            input_data: input,
            language: locale,
            preferences: Preferences::new(locale),
        }
    }

    pub fn with_preferences(mut self, detailed_analysis: bool, quick_preview: bool) -> Self {
        self.preferences.detailed_analysis = detailed_analysis;
        self.preferences.quick_preview = quick_preview;
        self
    }
}

/// One named section of an analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTab {
    pub name: String,
    pub content: String,
}

/// Immediate-preview block attached by the non-streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessing {
    pub status: String,
    pub preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Final analysis handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub tabs: Vec<ResultTab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Preprocessing>,
}

impl AnalysisResult {
    /// Result shown when the backend reports an error event mid-stream.
    ///
    /// The server message is surfaced verbatim; the tab adds the localized retry hint.
    pub fn server_error(message: &str, locale: Locale) -> Self {
        Self {
            summary: message.to_string(),
            language: None,
            tabs: vec![ResultTab {
                name: i18n::text(Message::ErrorLabel, locale).to_string(),
                content: format!("{message}\n\n{}", i18n::text(Message::RetryHint, locale)),
            }],
            preprocessing: None,
        }
    }

    /// Result shown when both the stream and the fallback request failed.
    pub fn failure(reason: &str, locale: Locale) -> Self {
        Self {
            summary: i18n::analysis_error(reason, locale),
            language: None,
            tabs: vec![ResultTab {
                name: i18n::text(Message::ErrorLabel, locale).to_string(),
                content: i18n::text(Message::RetryHint, locale).to_string(),
            }],
            preprocessing: None,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub active_requests: Option<u64>,
    #[serde(default)]
    pub server: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
