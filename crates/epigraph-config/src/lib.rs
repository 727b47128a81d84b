// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Epigraph client.
//!
//! `epigraph.toml` files from the XDG hierarchy are merged with `EPIGRAPH_*`
//! overrides and deserialized strictly, so unknown keys are errors. Failures
//! come back as [`ConfigError`]s that miette renders against the source file.
//!
//! # Usage
//!
//! ```no_run
//! use epigraph_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("backend: {}", config.backend.api_root());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{EpigraphConfig, RouteMode};

/// Loads the layered configuration (see [`loader::search_paths`]) and validates it.
pub fn load_and_validate() -> Result<EpigraphConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::search_paths()
            .iter()
            .filter_map(|path| read_source(&absolute(path)))
            .collect()
    })
}

/// Like [`load_and_validate`], but with `path` as the only config file.
pub fn load_and_validate_path(path: &Path) -> Result<EpigraphConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Validates an inline TOML document. Environment overrides do not apply.
pub fn load_and_validate_str(toml_content: &str) -> Result<EpigraphConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Runs semantic validation on success. On a Figment error the TOML sources
/// are read lazily so diagnostics can point at the offending line.
fn checked(
    loaded: Result<EpigraphConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<EpigraphConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::from_figment(err, &sources())),
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    Some((path.display().to_string(), content))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
