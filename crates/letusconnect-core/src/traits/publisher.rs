// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pub/sub publisher adapter trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the external pub/sub broker.
#[async_trait]
pub trait EventPublisher: PluginAdapter {
    /// Publishes `event` with a wire-shape `payload` on `topic`.
    async fn publish(&self, topic: &str, event: &str, payload: &Value) -> Result<(), ConnectError>;
}
