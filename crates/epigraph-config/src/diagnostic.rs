// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment reports what went wrong but not where. This module maps each
//! Figment error onto a [`ConfigError`] that miette can render with the
//! offending line of `epigraph.toml` and, for misspelled keys, sections and
//! enum values, a Jaro-Winkler "did you mean" hint.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Below this Jaro-Winkler score a candidate is not offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Top-level sections of `epigraph.toml`.
const SECTIONS: [&str; 3] = ["app", "backend", "analysis"];

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that its section does not define.
    #[error("unknown key `{key}` in [{section}]")]
    #[diagnostic(
        code(epigraph::config::unknown_key),
        help("{}", hint(suggestion.as_deref(), "keys", valid_keys))
    )]
    UnknownKey {
        key: String,
        section: String,
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("not a key of [{section}]")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A top-level table other than `[app]`, `[backend]` or `[analysis]`.
    #[error("unknown section [{section}]")]
    #[diagnostic(
        code(epigraph::config::unknown_section),
        help("{}", hint(suggestion.as_deref(), "sections", &SECTIONS.join(", ")))
    )]
    UnknownSection {
        section: String,
        suggestion: Option<String>,
        #[label("unknown section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value outside a closed set, such as `locale = "fr"`.
    #[error("`{value}` is not a valid value for `{key}`")]
    #[diagnostic(
        code(epigraph::config::invalid_value),
        help("{}", hint(suggestion.as_deref(), "values", allowed))
    )]
    InvalidValue {
        key: String,
        value: String,
        suggestion: Option<String>,
        allowed: String,
        #[label("expected one of: {allowed}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type, such as a string timeout.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(epigraph::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A semantic check failed after deserialization.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(epigraph::config::validation))]
    Validation { message: String },

    /// Anything else Figment reported, e.g. an unreadable file.
    #[error("configuration error: {0}")]
    #[diagnostic(code(epigraph::config::other))]
    Other(String),
}

fn hint(suggestion: Option<&str>, noun: &str, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid {noun}: {valid}"),
        None => format!("valid {noun}: {valid}"),
    }
}

/// Converts every error carried by `err` into a [`ConfigError`].
///
/// `sources` holds `(path, content)` pairs of the TOML files that were
/// merged; they are only used to attach spans.
pub fn from_figment(err: figment::Error, sources: &[(String, String)]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(ToString::to_string).collect();
            let source = source_of(&error, sources);

            match &error.kind {
                Kind::UnknownField(field, expected) if section.is_empty() => {
                    let (span, src) = locate(source, &[], &format!("[{field}]"));
                    ConfigError::UnknownSection {
                        section: field.clone(),
                        suggestion: suggest_key(field, expected),
                        span,
                        src,
                    }
                }
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(source, &section, field);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: section.join("."),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::UnknownVariant(value, expected) => {
                    let (table, key) = split_key(&section);
                    let (span, src) = locate(source, table, key);
                    ConfigError::InvalidValue {
                        key: section.join("."),
                        value: value.clone(),
                        suggestion: suggest_key(value, expected),
                        allowed: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(found, expected) => {
                    let (table, key) = split_key(&section);
                    let (span, src) = locate(source, table, key);
                    ConfigError::InvalidType {
                        key: section.join("."),
                        found: found.to_string(),
                        expected: expected.clone(),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::Validation {
                    message: format!("missing required key `{field}`"),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Splits a dotted path into its table and final key.
fn split_key(path: &[String]) -> (&[String], &str) {
    match path.split_last() {
        Some((key, table)) => (table, key.as_str()),
        None => (&[], ""),
    }
}

/// The file content the error originated from, if it was one of `sources`.
fn source_of<'a>(
    error: &figment::Error,
    sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str)> {
    let origin = error.metadata.as_ref()?.source.as_ref()?;
    let figment::Source::File(path) = origin else {
        return None;
    };
    let path = path.display().to_string();
    sources
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(p, content)| (p.as_str(), content.as_str()))
}

fn locate(
    source: Option<(&str, &str)>,
    table: &[String],
    needle: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((path, content)) = source else {
        return (None, None);
    };
    match find_key_offset(content, table, needle) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), needle.len())),
            Some(NamedSource::new(path, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `needle` at the start of a line inside `[table]`.
///
/// Scanning tracks the current table header, so a key is only matched in
/// its own section even when sections repeat or appear out of order. With
/// an empty `table`, every line is searched (used for section headers).
pub fn find_key_offset(content: &str, table: &[String], needle: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.split(']').next()) {
            if table.is_empty() && trimmed.starts_with(needle) {
                return Some(offset + indent);
            }
            current = header.trim().to_string();
        } else if !table.is_empty() && current == wanted {
            if let Some(rest) = trimmed.strip_prefix(needle) {
                if rest.trim_start().starts_with('=') {
                    return Some(offset + indent);
                }
            }
        }

        offset += line.len();
    }

    None
}

/// Closest candidate to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|candidate| (strsim::jaro_winkler(unknown, candidate), *candidate))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Writes every error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_base_url_for_typo() {
        let valid = &["base_url", "mode", "rewrite_origin", "api_path"];
        assert_eq!(suggest_key("base_ur", valid), Some("base_url".to_string()));
    }

    #[test]
    fn suggests_locale_for_lokale() {
        assert_eq!(
            suggest_key("lokale", &["log_level", "locale"]),
            Some("locale".to_string())
        );
    }

    #[test]
    fn suggests_section_and_variant() {
        assert_eq!(suggest_key("backnd", &SECTIONS), Some("backend".to_string()));
        assert_eq!(
            suggest_key("rewite", &["direct", "rewrite"]),
            Some("rewrite".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("zzzzzz", &["detailed_analysis", "quick_preview"]), None);
    }

    #[test]
    fn key_is_found_only_in_its_own_section() {
        let content = "[app]\nmode = 1\n\n[backend]\n  mode = \"proxy\"\n";
        let o = find_key_offset(content, &["backend".to_string()], "mode").unwrap();
        assert_eq!(&content[o..o + 4], "mode");
        assert!(o > content.find("[backend]").unwrap());
    }

    #[test]
    fn key_prefix_does_not_match_longer_key() {
        let content = "[backend]\nbase_url = \"x\"\n";
        assert_eq!(find_key_offset(content, &["backend".to_string()], "base_ur"), None);
    }

    #[test]
    fn section_header_is_located() {
        let content = "[app]\nlocale = \"en\"\n[telegram]\n";
        let o = find_key_offset(content, &[], "[telegram]").unwrap();
        assert_eq!(&content[o..o + 10], "[telegram]");
    }

    #[test]
    fn missing_section_yields_no_offset() {
        let content = "[app]\nlocale = \"en\"\n";
        assert_eq!(find_key_offset(content, &["backend".to_string()], "mode"), None);
    }
}
