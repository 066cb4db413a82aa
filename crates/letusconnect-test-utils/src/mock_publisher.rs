// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording event publisher for deterministic testing.
//!
//! `MockPublisher` implements `EventPublisher` by capturing every publish
//! call. It can be switched into a failing mode to exercise the
//! persist-then-publish degradation path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use letusconnect_core::{
    AdapterType, ConnectError, EventPublisher, HealthStatus, PluginAdapter,
};

/// A single captured publish call.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

/// A mock broker for testing.
#[derive(Default)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<PublishedEvent>>>,
    failing: AtomicBool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every publish attempt that succeeded, in call order.
    pub async fn published(&self) -> Vec<PublishedEvent> {
        self.published.lock().await.clone()
    }

    pub async fn published_count(&self) -> usize {
        self.published.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockPublisher {
    fn name(&self) -> &str {
        "mock-publisher"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Publisher
    }

    async fn health_check(&self) -> Result<HealthStatus, ConnectError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("failing mode".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), ConnectError> {
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish(&self, topic: &str, event: &str, payload: &Value) -> Result<(), ConnectError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConnectError::Broker {
                message: "mock publisher is failing".to_string(),
                source: None,
            });
        }
        self.published.lock().await.push(PublishedEvent {
            topic: topic.to_string(),
            event: event.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_publishes() {
        let publisher = MockPublisher::new();
        publisher
            .publish("direct-messages-u2", "new-direct-message", &json!({"a": 1}))
            .await
            .unwrap();

        let events = publisher.published().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, "direct-messages-u2");
        assert_eq!(events[0].event, "new-direct-message");
    }

    #[tokio::test]
    async fn failing_mode_rejects_and_records_nothing() {
        let publisher = MockPublisher::new();
        publisher.set_failing(true);
        assert!(publisher.publish("t", "e", &json!({})).await.is_err());
        assert_eq!(publisher.published_count().await, 0);
        assert_eq!(
            publisher.health_check().await.unwrap().label(),
            "unhealthy"
        );
    }
}
