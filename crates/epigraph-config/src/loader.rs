// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Compiled defaults are overlaid by every file in [`search_paths`] (lowest
//! precedence first) and finally by `EPIGRAPH_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EpigraphConfig;

const FILE_NAME: &str = "epigraph.toml";

/// Sections an environment variable may address.
const ENV_SECTIONS: [&str; 3] = ["app", "backend", "analysis"];

/// Config files consulted by [`load_config`], system-wide first, local last.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("/etc/epigraph").join(FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("epigraph").join(FILE_NAME));
    }
    paths.push(PathBuf::from(FILE_NAME));
    paths
}

/// Loads defaults, every file from [`search_paths`] and env overrides.
pub fn load_config() -> Result<EpigraphConfig, figment::Error> {
    search_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
        .extract()
}

/// Loads a single file on top of the defaults, then env overrides.
pub fn load_config_from_path(path: &Path) -> Result<EpigraphConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads an inline TOML document on top of the defaults. The environment is ignored.
pub fn load_config_from_str(toml_content: &str) -> Result<EpigraphConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(EpigraphConfig::default()))
}

fn env_provider() -> Env {
    Env::prefixed("EPIGRAPH_").map(|key| map_env_key(key.as_str()).into())
}

/// `backend_base_url` becomes `backend.base_url`.
///
/// Only the first underscore after a known section name is a separator;
/// keys themselves keep their underscores.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
