// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Epigraph configuration system.

use epigraph_config::diagnostic::ConfigError;
use epigraph_config::model::{EpigraphConfig, RouteMode};
use epigraph_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use epigraph_core::Locale;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_epigraph_config() {
    let toml = r#"
[app]
log_level = "debug"
locale = "en"

[backend]
base_url = "https://epigraph-ai.example"
mode = "rewrite"
rewrite_origin = "http://localhost:3000"
api_path = "/api"
request_timeout_secs = 120
connect_timeout_secs = 5

[analysis]
detailed_analysis = false
quick_preview = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.app.locale, Locale::En);
    assert_eq!(config.backend.base_url, "https://epigraph-ai.example");
    assert_eq!(config.backend.mode, RouteMode::Rewrite);
    assert_eq!(config.backend.request_timeout_secs, 120);
    assert_eq!(config.backend.connect_timeout_secs, 5);
    assert!(!config.analysis.detailed_analysis);
    assert!(config.analysis.quick_preview);
    assert_eq!(config.backend.api_root(), "http://localhost:3000/api");
}

/// Missing sections fall back to compiled defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.app.locale, Locale::He);
    assert_eq!(config.backend.mode, RouteMode::Direct);
    assert_eq!(config.backend.api_root(), "http://127.0.0.1:5328/api");
    assert!(config.analysis.detailed_analysis);
    assert!(config.analysis.quick_preview);
}

/// Unknown field in [backend] is rejected.
#[test]
fn unknown_field_in_backend_produces_error() {
    let toml = r#"
[backend]
base_ur = "http://localhost:5328"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_ur"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level sections are rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Unsupported locale is a deserialization error.
#[test]
fn unsupported_locale_is_rejected() {
    let toml = r#"
[app]
locale = "fr"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Diagnostics carry a suggestion and the valid keys of the section.
#[test]
fn diagnostic_error_includes_suggestion_and_valid_keys() {
    let toml = r#"
[backend]
base_ur = "http://localhost:5328"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "base_ur"
                && suggestion.as_deref() == Some("base_url")
                && valid_keys.contains("rewrite_origin")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'base_ur' with suggestion 'base_url', got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[backend]
request_timeout_secs = "forever"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("request_timeout_secs"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_rejects_zero_timeout() {
    let toml = r#"
[backend]
connect_timeout_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero timeout should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("connect_timeout_secs")
    )));
}

/// ConfigError renders through miette with its code.
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::Validation {
        message: "backend.api_path `api` must start with `/`".into(),
    };
    let code = error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("epigraph::config::validation"));
}

/// Explicit file loading honors `EPIGRAPH_*` overrides.
#[test]
fn explicit_file_with_env_override() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[app]
locale = "en"

[backend]
base_url = "http://from-file:5328"
"#,
        )?;
        jail.set_env("EPIGRAPH_BACKEND_BASE_URL", "http://from-env:5328");

        let config: EpigraphConfig =
            load_and_validate_path(std::path::Path::new("custom.toml")).expect("should load");
        assert_eq!(config.app.locale, Locale::En);
        assert_eq!(config.backend.base_url, "http://from-env:5328");
        Ok(())
    });
}

/// Serialized defaults survive a TOML round trip, as printed by `epigraph config`.
#[test]
fn defaults_serialize_to_loadable_toml() {
    let rendered = toml::to_string(&EpigraphConfig::default()).expect("should serialize");
    let config = load_and_validate_str(&rendered).expect("rendered defaults should validate");
    assert_eq!(config.backend.base_url, "http://127.0.0.1:5328");
}

/// Misspelled section names are reported with a suggestion.
#[test]
fn unknown_section_suggests_closest() {
    let errors = load_and_validate_str("[backnd]\nbase_url = \"http://x\"\n").expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownSection { section, suggestion, .. }
            if section == "backnd" && suggestion.as_deref() == Some("backend")
    )), "got: {errors:?}");
}

/// Values outside a closed set list the allowed ones.
#[test]
fn invalid_locale_lists_allowed_values() {
    let errors = load_and_validate_str("[app]\nlocale = \"eng\"\n").expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidValue { value, suggestion, allowed, .. }
            if value == "eng" && suggestion.as_deref() == Some("en") && allowed.contains("he")
    )), "got: {errors:?}");
}
