// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the LetUsConnect backend.
//!
//! Provides the REST send routes backed by the ingress pipeline, the
//! WebSocket upgrade route backed by the session [`Manager`], and the public
//! health endpoint.

pub mod auth;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod ingress;
pub mod server;
pub mod session;
pub mod ws;

pub use error::ApiError;
pub use server::{bind, router, serve, start_server, GatewayState};
pub use session::{Client, Manager, SessionSettings};
