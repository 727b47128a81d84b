// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL shapes, path prefixes and non-zero timeouts.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::EpigraphConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &EpigraphConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (key, value) in [
        ("backend.base_url", &config.backend.base_url),
        ("backend.rewrite_origin", &config.backend.rewrite_origin),
    ] {
        if let Err(reason) = check_http_url(value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` {reason}"),
            });
        }
    }

    if !config.backend.api_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "backend.api_path `{}` must start with `/`",
                config.backend.api_path
            ),
        });
    }

    if config.backend.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.backend.connect_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.connect_timeout_secs must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that `value` parses as an absolute http(s) URL with a host.
fn check_http_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("is not a valid URL: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("must use http or https, not `{}`", url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("has no host".to_string());
    }

    Ok(())
}
