// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Epigraph client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use epigraph_core::Locale;
use serde::{Deserialize, Serialize};

/// Top-level Epigraph configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EpigraphConfig {
    /// Client behavior: language and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Where and how to reach the analysis backend.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Analysis preferences sent with every request.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Client behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// UI and output language.
    #[serde(default)]
    pub locale: Locale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            locale: Locale::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How requests reach the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Requests go straight to `base_url`.
    #[default]
    Direct,
    /// Requests go to a local origin whose `/api/` path is rewritten to the backend.
    Rewrite,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend host, used in `direct` mode.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Routing mode.
    #[serde(default)]
    pub mode: RouteMode,

    /// Local origin used in `rewrite` mode.
    #[serde(default = "default_rewrite_origin")]
    pub rewrite_origin: String,

    /// Path prefix of the API endpoints.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Overall timeout for one request, including reading the stream.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for establishing the connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mode: RouteMode::default(),
            rewrite_origin: default_rewrite_origin(),
            api_path: default_api_path(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Origin requests are sent to under the configured mode.
    pub fn origin(&self) -> &str {
        match self.mode {
            RouteMode::Direct => &self.base_url,
            RouteMode::Rewrite => &self.rewrite_origin,
        }
    }

    /// Root URL of the API, without a trailing slash.
    ///
    /// ```
    /// use epigraph_config::model::BackendConfig;
    ///
    /// let backend = BackendConfig::default();
    /// assert_eq!(backend.api_root(), "http://127.0.0.1:5328/api");
    /// ```
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.origin().trim_end_matches('/'),
            self.api_path.trim_matches('/')
        )
        .trim_end_matches('/')
        .to_string()
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5328".to_string()
}

fn default_rewrite_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_path() -> String {
    "/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Analysis preference configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Ask for the long-form analysis.
    #[serde(default = "default_true")]
    pub detailed_analysis: bool,

    /// Ask for the immediate preview.
    #[serde(default = "default_true")]
    pub quick_preview: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detailed_analysis: true,
            quick_preview: true,
        }
    }
}

fn default_true() -> bool {
    true
}
