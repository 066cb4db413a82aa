// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer authentication middleware for the REST routes.
//!
//! Expects `Authorization: Bearer <token>`. On success the resolved
//! [`AuthenticatedUser`] is inserted into request extensions for handlers to
//! extract. Every failure is a bare 401; the cause is only logged at debug.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use letusconnect_core::{AuthenticatedUser, TokenVerifier};

use crate::error::ApiError;

/// Extract a non-empty bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve a bearer string to a user, collapsing every rejection to 401.
pub fn authenticate(
    verifier: &dyn TokenVerifier,
    token: Option<&str>,
) -> Result<AuthenticatedUser, ApiError> {
    let token = token.ok_or(ApiError::Unauthorized)?;
    verifier.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "bearer credential rejected");
        ApiError::Unauthorized
    })
}

/// Middleware that requires a valid bearer token.
pub async fn auth_middleware(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(verifier.as_ref(), bearer_token(request.headers()))?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
