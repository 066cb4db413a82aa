// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /api/v1/messages/direct, POST /api/v1/group-chats/messages
//! and the unauthenticated GET /health.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use letusconnect_core::{AuthenticatedUser, DirectMessage, GroupMessage, HealthStatus};

use crate::error::ApiError;
use crate::ingress;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" when every adapter is healthy, otherwise "degraded".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was built.
    pub uptime_secs: u64,
    /// Live WebSocket sessions.
    pub sessions: usize,
    /// Store adapter status label.
    pub store: String,
    /// Publisher adapter status label.
    pub publisher: String,
}

/// POST /api/v1/messages/direct
pub async fn post_direct_message(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let (status, body) = ingress::ingest::<DirectMessage>(&state, &user, &body).await?;
    Ok((status, body).into_response())
}

/// POST /api/v1/group-chats/messages
pub async fn post_group_message(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let (status, body) = ingress::ingest::<GroupMessage>(&state, &user, &body).await?;
    Ok((status, body).into_response())
}

/// GET /health (unauthenticated, for load balancers and systemd).
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let store = adapter_label(state.store.health_check().await);
    let publisher = adapter_label(state.publisher.health_check().await);
    let healthy = store == "healthy" && publisher == "healthy";

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.manager.connected_count().await,
        store,
        publisher,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}

fn adapter_label(result: Result<HealthStatus, letusconnect_core::ConnectError>) -> String {
    match result {
        Ok(status) => status.label().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HealthStatus::Unhealthy(e.to_string()).label().to_string()
        }
    }
}
