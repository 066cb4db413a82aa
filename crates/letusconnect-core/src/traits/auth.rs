// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer credential verification trait.

use crate::error::ConnectError;
use crate::types::AuthenticatedUser;

/// Resolves an opaque bearer string to a user.
///
/// Called synchronously from every upgrade and ingress request. Every
/// rejection is [`ConnectError::Unauthenticated`], whatever the cause.
pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, ConnectError>;
}
