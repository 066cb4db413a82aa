// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pub/sub broker adapter for the LetUsConnect backend.
//!
//! Provides [`PusherPublisher`], an [`EventPublisher`](letusconnect_core::EventPublisher)
//! speaking the Pusher Channels HTTP events API with signed requests.

pub mod client;
pub mod signing;

pub use client::PusherPublisher;
