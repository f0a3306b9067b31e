// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./thalamus.toml` > `~/.config/thalamus/thalamus.toml` >
//! `/etc/thalamus/thalamus.toml`, then environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ThalamusConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/thalamus/thalamus.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "thalamus.toml";

/// Environment variables understood without the `THALAMUS_` prefix.
pub const LEGACY_ENV_VARS: &[&str] = &["CORTEX_IP", "CEREBELLUM_IP", "OLLAMA_PORT"];

/// User config file under the XDG config directory, if one can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("thalamus").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the file hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/thalamus/thalamus.toml`
/// 3. `~/.config/thalamus/thalamus.toml`
/// 4. `./thalamus.toml`
/// 5. `CORTEX_IP`, `CEREBELLUM_IP`, `OLLAMA_PORT`
/// 6. `THALAMUS_*`
pub fn load_config() -> Result<ThalamusConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over compiled defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<ThalamusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThalamusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<ThalamusConfig, figment::Error> {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(ThalamusConfig::default()))
            .merge(Toml::file(path)),
    )
    .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(ThalamusConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    with_env(figment.merge(Toml::file(LOCAL_CONFIG_FILE)))
}

fn with_env(figment: Figment) -> Figment {
    figment.merge(legacy_env_provider()).merge(env_provider())
}

/// `THALAMUS_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `THALAMUS_OLLAMA_TIMEOUT_SECS` lands on `ollama.timeout_secs`.
fn env_provider() -> Env {
    Env::prefixed("THALAMUS_").map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        let mapped = ["agent", "cerebellum", "cortex", "ollama", "ledger", "bench"]
            .iter()
            .find_map(|section| {
                lower
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(lower);
        mapped.into()
    })
}

/// Unprefixed node variables, as commonly kept in a `.env` file.
fn legacy_env_provider() -> Env {
    Env::raw().only(LEGACY_ENV_VARS).map(|key| {
        let mapped = match key.as_str().to_ascii_uppercase().as_str() {
            "CORTEX_IP" => "cortex.host",
            "CEREBELLUM_IP" => "cerebellum.host",
            "OLLAMA_PORT" => "ollama.port",
            _ => "",
        };
        mapped.to_string().into()
    })
}
