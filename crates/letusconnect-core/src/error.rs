// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the LetUsConnect backend.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration errors (missing secrets, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Document store errors (connection, write, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Pub/sub broker errors (transport failure, rejected event).
    #[error("broker error: {message}")]
    Broker {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Bearer credential rejected.
    ///
    /// Carries no cause: malformed, expired and foreign-signed
    /// tokens all surface as this one variant.
    #[error("invalid or expired token")]
    Unauthenticated,

    /// A wire value had the wrong JSON type for its field.
    #[error("field `{field}` must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// A decoded record violates a model invariant.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Session channel errors (owner loop gone, queue closed).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConnectError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
