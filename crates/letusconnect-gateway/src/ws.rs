// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket upgrade handler.
//!
//! `GET /api/v1/ws/{id}?token=<bearer>` authenticates from the query string,
//! upgrades, registers a [`Client`] with the manager and runs the read and
//! write loops until both have finished.
//!
//! Client -> Server and Server -> Client frames share one envelope:
//! ```json
//! {"type": "chat", "content": {"text": "hi"}, "from": "u1", "to": "u2", "time": 1700000000}
//! ```
//! `from` is always rewritten to the authenticated user.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Deserialize;

use letusconnect_core::AuthenticatedUser;

use crate::auth::authenticate;
use crate::server::GatewayState;
use crate::session::{pump, Client};

/// Query parameters accepted on the upgrade route.
#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// Authenticate, then upgrade.
///
/// 401 for a missing or rejected token, 400 for a malformed handshake and
/// 500 when the underlying connection cannot be upgraded. Nothing is
/// registered unless the upgrade is accepted.
pub async fn ws_handler(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(params): Query<WsParams>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let user = match authenticate(state.verifier.as_ref(), params.token.as_deref()) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            let status = match rejection {
                WebSocketUpgradeRejection::ConnectionNotUpgradable(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            };
            tracing::debug!(user_id = %user.user_id, %status, "websocket upgrade rejected");
            return status.into_response();
        }
    };

    if id != user.user_id {
        tracing::debug!(path_id = %id, user_id = %user.user_id, "path id differs from token subject");
    }

    upgrade
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| handle_socket(socket, user, state))
}

/// Run one session to completion.
async fn handle_socket(socket: WebSocket, user: AuthenticatedUser, state: GatewayState) {
    let (client, outbound) = Client::new(&user.user_id, state.session.outbound_queue_size);
    let client_id = client.id();
    if let Err(e) = state.manager.register(client) {
        tracing::error!(user_id = %user.user_id, error = %e, "could not register session");
        return;
    }
    tracing::info!(user_id = %user.user_id, %client_id, "websocket session opened");

    let (sink, stream) = socket.split();
    let cancel = state.shutdown.child_token();

    let writer = tokio::spawn(pump::write_loop(
        sink,
        outbound,
        state.session,
        cancel.clone(),
    ));
    pump::read_loop(stream, &user.user_id, client_id, &state.manager, &cancel).await;

    match writer.await {
        Ok(exit) => {
            tracing::info!(user_id = %user.user_id, %client_id, ?exit, "websocket session closed");
        }
        Err(e) => {
            tracing::error!(user_id = %user.user_id, error = %e, "write loop panicked");
        }
    }
}
