// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as required secrets, a usable bind host, and non-zero session limits.

use crate::diagnostic::ConfigError;
use crate::model::{ConnectConfig, StorageBackend};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConnectConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.allowed_origins.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.allowed_origins must list at least one origin".to_string(),
        });
    }
    for origin in &config.server.allowed_origins {
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.allowed_origins entry `{origin}` must start with http:// or https://"
                ),
            });
        }
    }

    require(
        &mut errors,
        &config.auth.jwt_secret,
        "auth.jwt_secret",
        "JWT_SECRET",
    );
    require(
        &mut errors,
        &config.broker.app_id,
        "broker.app_id",
        "PUSHER_APP_ID",
    );
    require(&mut errors, &config.broker.key, "broker.key", "PUSHER_KEY");
    require(
        &mut errors,
        &config.broker.secret,
        "broker.secret",
        "PUSHER_SECRET",
    );

    if config.broker.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "broker.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.session.outbound_queue_size == 0 {
        errors.push(ConfigError::Validation {
            message: "session.outbound_queue_size must be at least 1".to_string(),
        });
    }

    if config.session.heartbeat_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.heartbeat_interval_secs must be at least 1".to_string(),
        });
    }

    if config.session.write_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.write_timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn require(errors: &mut Vec<ConfigError>, value: &Option<String>, key: &str, env: &str) {
    if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
        errors.push(ConfigError::MissingKey {
            key: key.to_string(),
            env: Some(env.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ConnectConfig {
        let mut config = ConnectConfig::default();
        config.auth.jwt_secret = Some("secret".into());
        config.broker.app_id = Some("1".into());
        config.broker.key = Some("key".into());
        config.broker.secret = Some("broker-secret".into());
        config
    }

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors.iter().any(|e| match e {
            ConfigError::Validation { message } => message.contains(needle),
            ConfigError::MissingKey { key, .. } => key.contains(needle),
            _ => false,
        })
    }

    #[test]
    fn complete_config_validates() {
        assert!(validate_config(&complete()).is_ok());
    }

    #[test]
    fn default_config_reports_every_missing_secret() {
        let errors = validate_config(&ConnectConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        for key in ["auth.jwt_secret", "broker.app_id", "broker.key", "broker.secret"] {
            assert!(has_message(&errors, key), "missing {key}: {errors:?}");
        }
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let mut config = complete();
        config.auth.jwt_secret = Some("  ".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "auth.jwt_secret"));
    }

    #[test]
    fn zero_queue_size_fails_validation() {
        let mut config = complete();
        config.session.outbound_queue_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "outbound_queue_size"));
    }

    #[test]
    fn zero_heartbeat_fails_validation() {
        let mut config = complete();
        config.session.heartbeat_interval_secs = 0;
        assert!(has_message(
            &validate_config(&config).unwrap_err(),
            "heartbeat_interval_secs"
        ));
    }

    #[test]
    fn origin_without_scheme_fails_validation() {
        let mut config = complete();
        config.server.allowed_origins = vec!["localhost:3000".into()];
        assert!(has_message(
            &validate_config(&config).unwrap_err(),
            "localhost:3000"
        ));
    }

    #[test]
    fn memory_backend_ignores_database_path() {
        let mut config = complete();
        config.storage.backend = StorageBackend::Memory;
        config.storage.database_path = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn invalid_host_fails_validation() {
        let mut config = complete();
        config.server.host = "not a host!".into();
        assert!(has_message(&validate_config(&config).unwrap_err(), "server.host"));
    }
}
