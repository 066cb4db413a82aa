// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use letusconnect_config::ServerConfig;
use letusconnect_core::{ConnectError, DocumentStore, EventPublisher, TokenVerifier};

use crate::auth::auth_middleware;
use crate::cors;
use crate::handlers;
use crate::session::{Manager, SessionSettings};
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Handle to the session registry.
    pub manager: Manager,
    /// Document store messages are persisted to.
    pub store: Arc<dyn DocumentStore>,
    /// Broker that announces accepted messages.
    pub publisher: Arc<dyn EventPublisher>,
    /// Bearer credential verifier.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Per-session tuning.
    pub session: SessionSettings,
    /// Cancelled when the process begins shutting down.
    pub shutdown: CancellationToken,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("store", &self.store.name())
            .field("publisher", &self.publisher.name())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Build the full route table.
///
/// - GET /health (public)
/// - POST /api/v1/messages/direct (bearer auth)
/// - POST /api/v1/group-chats/messages (bearer auth)
/// - GET /api/v1/ws/{id}?token= (auth during handshake, not via middleware)
pub fn router(state: GatewayState, allowed_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/v1/messages/direct", post(handlers::post_direct_message))
        .route(
            "/api/v1/group-chats/messages",
            post(handlers::post_group_message),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state.verifier),
            auth_middleware,
        ))
        .layer(cors::rest_layer(allowed_origins))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/api/v1/ws/{id}", get(ws::ws_handler))
        .layer(cors::ws_layer(allowed_origins))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured host:port.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ConnectError> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| ConnectError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Serve `app` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ConnectError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("gateway listening on {addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ConnectError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Bind and serve with the state's shutdown token.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), ConnectError> {
    let shutdown = state.shutdown.clone();
    let listener = bind(config).await?;
    let app = router(state, &config.allowed_origins);
    serve(listener, app, shutdown).await
}
