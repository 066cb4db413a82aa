// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the LetUsConnect backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level LetUsConnect configuration.
///
/// All sections default to sensible values, except the signing secret and
/// broker credentials which validation requires.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectConfig {
    /// HTTP listener and CORS settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer credential verification settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Pub/sub broker credentials.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Document store backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// WebSocket session tuning.
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Browser origins allowed by CORS. WebSocket upgrades additionally
    /// accept the `ws://`/`wss://` form of each.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://letusconnect.vercel.app".to_string(),
    ]
}

/// Bearer credential configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret used to verify HS256 bearer tokens. Required.
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .finish()
    }
}

/// Pusher-compatible broker configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Application id. Required.
    #[serde(default)]
    pub app_id: Option<String>,

    /// Application key. Required.
    #[serde(default)]
    pub key: Option<String>,

    /// Application secret used to sign requests. Required.
    #[serde(default)]
    pub secret: Option<String>,

    /// Cluster used to derive the API host.
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Explicit API base URL, overriding the cluster host.
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_broker_timeout")]
    pub timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            key: None,
            secret: None,
            cluster: default_cluster(),
            base_url: None,
            timeout_secs: default_broker_timeout(),
        }
    }
}

impl BrokerConfig {
    /// API base URL: the explicit override, else the cluster host.
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api-{}.pusher.com", self.cluster),
        }
    }
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .field("secret", &redacted(&self.secret))
            .field("cluster", &self.cluster)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_cluster() -> String {
    "mt1".to_string()
}

fn default_broker_timeout() -> u64 {
    10
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "[redacted]")
}

/// Document store backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Persistent SQLite database.
    #[default]
    Sqlite,
    /// Process-local map; contents are lost on exit.
    Memory,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("letusconnect").join("letusconnect.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("letusconnect.db"))
        .to_string_lossy()
        .to_string()
}

/// WebSocket session tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Slots in each client's outbound queue. A full queue evicts the client.
    #[serde(default = "default_outbound_queue_size")]
    pub outbound_queue_size: usize,

    /// Seconds between heartbeat pings.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Seconds a single frame write may take before the session is dropped.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_queue_size: default_outbound_queue_size(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            write_timeout_secs: default_write_timeout(),
        }
    }
}

fn default_outbound_queue_size() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    60
}

fn default_write_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let auth = AuthConfig {
            jwt_secret: Some("hunter2".into()),
        };
        let broker = BrokerConfig {
            secret: Some("s3cr3t".into()),
            ..Default::default()
        };
        let out = format!("{auth:?} {broker:?}");
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("s3cr3t"));
        assert!(out.contains("[redacted]"));
    }

    #[test]
    fn endpoint_prefers_override() {
        let mut broker = BrokerConfig::default();
        assert_eq!(broker.endpoint(), "https://api-mt1.pusher.com");
        broker.base_url = Some("http://127.0.0.1:9999/".into());
        assert_eq!(broker.endpoint(), "http://127.0.0.1:9999");
    }
}
