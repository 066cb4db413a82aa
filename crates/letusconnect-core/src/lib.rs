// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the LetUsConnect messaging backend.
//!
//! This crate provides the canonical message model, the wire/store
//! representation mapper, the WebSocket envelope, error types, and the
//! adapter traits implemented by the storage, broker, and auth crates.

pub mod document;
pub mod envelope;
pub mod error;
pub mod group_chat;
pub mod mapper;
pub mod message;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use document::{Document, StoreValue};
pub use envelope::Envelope;
pub use error::ConnectError;
pub use group_chat::{Creator, GroupChat, GroupSettings, Participant};
pub use message::{BaseMessage, ChatMessage, DirectMessage, GroupMessage};
pub use types::{AdapterType, AuthenticatedUser, HealthStatus};

pub use traits::{DocumentStore, EventPublisher, PluginAdapter, TokenVerifier};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_display_round_trip() {
        use std::str::FromStr;

        for variant in [AdapterType::Store, AdapterType::Publisher] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
        assert_eq!(AdapterType::Publisher.to_string(), "publisher");
    }

    #[test]
    fn health_status_labels() {
        assert_eq!(HealthStatus::Healthy.label(), "healthy");
        assert_eq!(HealthStatus::Degraded("slow".into()).label(), "degraded");
        assert_eq!(HealthStatus::Unhealthy("down".into()).label(), "unhealthy");
    }

    #[test]
    fn unauthenticated_hides_cause() {
        assert_eq!(
            ConnectError::Unauthenticated.to_string(),
            "invalid or expired token"
        );
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_document_store<T: DocumentStore>() {}
        fn _assert_event_publisher<T: EventPublisher>() {}
        fn _assert_token_verifier<T: TokenVerifier>() {}
    }
}
