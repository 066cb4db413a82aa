// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.
//!
//! Store and publisher adapters extend the [`PluginAdapter`] base trait and
//! use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod publisher;
pub mod store;

pub use adapter::PluginAdapter;
pub use auth::TokenVerifier;
pub use publisher::EventPublisher;
pub use store::DocumentStore;
