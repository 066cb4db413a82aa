// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token verification for the LetUsConnect backend.
//!
//! Implements [`TokenVerifier`](letusconnect_core::TokenVerifier) over
//! HS256-signed JWTs. The token subject is the user id. Every rejection
//! collapses into [`ConnectError::Unauthenticated`](letusconnect_core::ConnectError).

pub mod jwt;

pub use jwt::{Claims, JwtVerifier, TokenIssuer};
