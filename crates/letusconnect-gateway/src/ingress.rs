// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message ingress pipeline shared by the direct and group send routes.
//!
//! Order is fixed: parse, map, assign id, authorize, validate, persist, then
//! publish. A publish failure after a successful persist is not rolled back;
//! the caller gets `202 Accepted` with `published: false` instead of `200`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use letusconnect_core::{AuthenticatedUser, ChatMessage, ConnectError};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Body returned by the send routes.
#[derive(Debug, Serialize)]
pub struct IngressResponse<M> {
    pub success: bool,
    /// The stored record in internal shape, including its server-assigned id.
    pub message: M,
    /// Whether the broker accepted the event.
    pub published: bool,
}

/// Run a raw request body through the full pipeline for message type `M`.
pub async fn ingest<M: ChatMessage>(
    state: &GatewayState,
    user: &AuthenticatedUser,
    body: &[u8],
) -> Result<(StatusCode, Json<IngressResponse<M>>), ApiError> {
    let wire = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            return Err(ApiError::BadRequest("Invalid request body".to_string()));
        }
    };

    let mut message = M::from_wire(&wire).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Client-supplied ids are never trusted.
    message.base_mut().id = Uuid::new_v4().to_string();

    if message.base().sender_id != user.user_id {
        tracing::warn!(
            user_id = %user.user_id,
            claimed = %message.base().sender_id,
            kind = M::KIND,
            "sender does not match authenticated user"
        );
        return Err(ApiError::Forbidden(
            "Cannot send messages on behalf of another user".to_string(),
        ));
    }

    message.validate().map_err(|e| match e {
        ConnectError::InvalidMessage(reason) => ApiError::BadRequest(reason),
        other => ApiError::BadRequest(other.to_string()),
    })?;

    let id = message.base().id.clone();
    if let Err(e) = state
        .store
        .insert(M::COLLECTION, &id, message.to_store())
        .await
    {
        tracing::error!(error = %e, collection = M::COLLECTION, %id, "persist failed");
        return Err(ApiError::Upstream(format!("Failed to save {}", M::KIND)));
    }

    let topic = message.topic();
    let payload = Value::Object(message.to_wire());
    let published = match state.publisher.publish(&topic, M::EVENT, &payload).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, %topic, %id, "publish failed after persist");
            false
        }
    };

    tracing::info!(
        %id,
        user_id = %user.user_id,
        %topic,
        published,
        kind = M::KIND,
        "message accepted"
    );

    let status = if published {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };
    Ok((
        status,
        Json(IngressResponse {
            success: true,
            message,
            published,
        }),
    ))
}
