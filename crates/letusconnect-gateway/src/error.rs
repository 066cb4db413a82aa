// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP-facing error kinds.
//!
//! Every variant renders as `{"success": false, "error": "..."}`. Upstream
//! failures carry a fixed "Failed to ..." string; the underlying cause is
//! logged at the call site and never echoed to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error returned by REST handlers and the ingress pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, expired or foreign-signed bearer credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Body is not a JSON object or a field has the wrong type.
    #[error("{0}")]
    BadRequest(String),

    /// Authenticated user does not match the claimed sender.
    #[error("{0}")]
    Forbidden(String),

    /// Store or broker failure.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
