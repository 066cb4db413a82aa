// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket session management.

mod client;
mod manager;
pub mod pump;

use std::time::Duration;

use letusconnect_config::SessionConfig;

pub use client::Client;
pub use manager::Manager;
pub use pump::WriteExit;

/// Runtime tuning for each session, resolved from [`SessionConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub outbound_queue_size: usize,
    pub heartbeat_interval: Duration,
    pub write_timeout: Duration,
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            outbound_queue_size: config.outbound_queue_size,
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}
