// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/callctl/callctl.toml`, then
//! `~/.config/callctl/callctl.toml`, then `./callctl.toml`, with `CALLCTL_`
//! environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::debug;

use crate::model::CallctlConfig;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/callctl/callctl.toml";
pub const LOCAL_CONFIG_PATH: &str = "callctl.toml";
pub const ENV_PREFIX: &str = "CALLCTL_";

/// `~/.config/callctl/callctl.toml`, when the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("callctl/callctl.toml"))
}

/// Candidate files in merge order. Later files win.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<CallctlConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only.
pub fn load_config_from_str(toml_content: &str) -> Result<CallctlConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CallctlConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CallctlConfig, figment::Error> {
    debug!(path = %path.display(), "loading config file");
    Figment::new()
        .merge(Serialized::defaults(CallctlConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The merged Figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(CallctlConfig::default()));
    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "merging config file");
        }
        figment = figment.merge(Toml::file(path));
    }

    let overrides: Vec<String> = std::env::vars()
        .map(|(key, _)| key)
        .filter(|key| key.to_ascii_uppercase().starts_with(ENV_PREFIX))
        .collect();
    if !overrides.is_empty() {
        debug!(keys = ?overrides, "applying environment overrides");
    }
    figment.merge(env_provider())
}

/// Maps `CALLCTL_<SECTION>_<KEY>` onto `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `CALLCTL_QUEUE_MAX_IN_FLIGHT` must become
/// `queue.max_in_flight` and `CALLCTL_QUEUE_PUBLISHERS_ASTERISK_PROXY`
/// must become `queue.publishers.asterisk_proxy`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    if let Some(rest) = key.strip_prefix("queue_publishers_") {
        return format!("queue.publishers.{rest}");
    }
    for section in ["service", "queue", "metrics"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
