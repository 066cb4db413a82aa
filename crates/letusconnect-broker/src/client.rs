// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Pusher Channels events API.
//!
//! Provides [`PusherPublisher`] which builds the event body, signs each
//! request, and retries once on transient upstream errors.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use letusconnect_config::model::BrokerConfig;
use letusconnect_core::{AdapterType, ConnectError, EventPublisher, HealthStatus, PluginAdapter};

use crate::signing;

/// Request body for `POST /apps/{app_id}/events`.
#[derive(Debug, Serialize)]
struct EventBody<'a> {
    name: &'a str,
    channels: [&'a str; 1],
    /// The payload, JSON-encoded into a string.
    data: String,
}

/// Publishes events to a Pusher-compatible broker.
#[derive(Clone)]
pub struct PusherPublisher {
    client: reqwest::Client,
    app_id: String,
    key: String,
    secret: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for PusherPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PusherPublisher")
            .field("app_id", &self.app_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PusherPublisher {
    /// Creates a publisher from validated broker configuration.
    pub fn from_config(config: &BrokerConfig) -> Result<Self, ConnectError> {
        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConnectError::Config(format!("broker.{name} is required")))
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConnectError::Broker {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            app_id: required(&config.app_id, "app_id")?,
            key: required(&config.key, "key")?,
            secret: required(&config.secret, "secret")?,
            base_url: config.endpoint(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the delay between retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn events_path(&self) -> String {
        format!("/apps/{}/events", self.app_id)
    }
}

#[async_trait]
impl PluginAdapter for PusherPublisher {
    fn name(&self) -> &str {
        "pusher"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Publisher
    }

    /// Reports healthy without a network round trip; failures surface on publish.
    async fn health_check(&self) -> Result<HealthStatus, ConnectError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConnectError> {
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for PusherPublisher {
    async fn publish(&self, topic: &str, event: &str, payload: &Value) -> Result<(), ConnectError> {
        let body = serde_json::to_vec(&EventBody {
            name: event,
            channels: [topic],
            data: payload.to_string(),
        })
        .map_err(|e| ConnectError::Broker {
            message: format!("failed to encode event: {e}"),
            source: Some(Box::new(e)),
        })?;

        let path = self.events_path();
        let endpoint = reqwest::Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            ConnectError::Broker {
                message: format!("invalid broker URL: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, topic, "retrying publish after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let query = signing::signed_query(
                &self.key,
                &self.secret,
                "POST",
                &path,
                Utc::now().timestamp(),
                &body,
            )?;
            let mut url = endpoint.clone();
            url.query_pairs_mut().extend_pairs(&query);

            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
                .await
                .map_err(|e| ConnectError::Broker {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, topic, event, attempt, "broker response received");

            if status.is_success() {
                return Ok(());
            }

            let text = response.text().await.unwrap_or_default();
            let error = ConnectError::Broker {
                message: format!("broker returned {status}: {text}"),
                source: None,
            };
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient broker error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| ConnectError::Broker {
            message: "publish failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
