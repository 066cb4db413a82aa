// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./letusconnect.toml` > `~/.config/letusconnect/letusconnect.toml`
//! > `/etc/letusconnect/letusconnect.toml`, with the conventional deployment
//! variables (`PORT`, `JWT_SECRET`, `PUSHER_*`) and `LETUSCONNECT_*` overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ConnectConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/letusconnect/letusconnect.toml";
pub(crate) const LOCAL_CONFIG: &str = "letusconnect.toml";

/// Sections addressable through `LETUSCONNECT_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["server", "auth", "broker", "storage", "session"];

/// Unprefixed variables honoured for compatibility with existing deployments.
const CONVENTIONAL_VARS: &[&str] = &[
    "PORT",
    "JWT_SECRET",
    "PUSHER_APP_ID",
    "PUSHER_KEY",
    "PUSHER_SECRET",
    "PUSHER_CLUSTER",
];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("letusconnect/letusconnect.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/letusconnect/letusconnect.toml` (system-wide)
/// 3. `~/.config/letusconnect/letusconnect.toml` (user XDG config)
/// 4. `./letusconnect.toml` (local directory)
/// 5. `PORT`, `JWT_SECRET`, `PUSHER_*`
/// 6. `LETUSCONNECT_*` environment variables
pub fn load_config() -> Result<ConnectConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ConnectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConnectConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConnectConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConnectConfig::default()))
        .merge(Toml::file(path))
        .merge(conventional_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ConnectConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(conventional_env_provider())
        .merge(env_provider())
}

/// `LETUSCONNECT_*` provider with explicit section-to-dot mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `LETUSCONNECT_SESSION_OUTBOUND_QUEUE_SIZE` maps to
/// `session.outbound_queue_size`.
fn env_provider() -> Env {
    Env::prefixed("LETUSCONNECT_").map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        section_key(&lower).unwrap_or(lower).into()
    })
}

fn section_key(key: &str) -> Option<String> {
    SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|rest| format!("{section}.{rest}"))
    })
}

fn conventional_env_provider() -> Env {
    Env::raw().only(CONVENTIONAL_VARS).map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        let mapped = match lower.as_str() {
            "port" => "server.port".to_string(),
            "jwt_secret" => "auth.jwt_secret".to_string(),
            other => other.replacen("pusher_", "broker.", 1),
        };
        mapped.into()
    })
}
