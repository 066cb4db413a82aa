// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical (internal) message model.
//!
//! Every variant embeds [`BaseMessage`] by value. Per-message `created_at`
//! and `updated_at` are opaque strings: they are carried through exactly as
//! the producer emitted them and never parsed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::ConnectError;
use crate::mapper;

/// Store collection names.
pub mod collections {
    pub const DIRECT_MESSAGES: &str = "direct_messages";
    pub const GROUP_MESSAGES: &str = "group_messages";
    pub const GROUP_CHATS: &str = "group_chats";
}

/// Broker event names.
pub mod events {
    pub const NEW_DIRECT_MESSAGE: &str = "new-direct-message";
    pub const NEW_GROUP_MESSAGE: &str = "new-group-message";
}

/// Payload shared by every message variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub read_status: BTreeMap<String, bool>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub reactions: BTreeMap<String, i64>,
    #[serde(default)]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub priority: String,
}

/// One-to-one message between two users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    #[serde(flatten)]
    pub base: BaseMessage,
    pub receiver_id: String,
}

/// Message posted to a project (and optionally a sub-group) chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessage {
    #[serde(flatten)]
    pub base: BaseMessage,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Behaviour the ingress pipeline needs from a message variant.
///
/// Ties each variant to its collection, broker event, topic derivation and
/// the four representation conversions.
pub trait ChatMessage: Serialize + Send + Sync + Sized + 'static {
    /// Human label used in log lines and generic error bodies.
    const KIND: &'static str;
    /// Store collection the variant is persisted to.
    const COLLECTION: &'static str;
    /// Broker event name announced on publish.
    const EVENT: &'static str;

    fn base(&self) -> &BaseMessage;

    fn base_mut(&mut self) -> &mut BaseMessage;

    /// Broker topic subscribers of this message listen on.
    fn topic(&self) -> String;

    /// Check variant invariants after mapping.
    fn validate(&self) -> Result<(), ConnectError>;

    fn from_wire(wire: &Map<String, Value>) -> Result<Self, ConnectError>;

    fn to_wire(&self) -> Map<String, Value>;

    fn from_store(doc: &Document) -> Self;

    fn to_store(&self) -> Document;
}

impl ChatMessage for DirectMessage {
    const KIND: &'static str = "direct message";
    const COLLECTION: &'static str = collections::DIRECT_MESSAGES;
    const EVENT: &'static str = events::NEW_DIRECT_MESSAGE;

    fn base(&self) -> &BaseMessage {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseMessage {
        &mut self.base
    }

    fn topic(&self) -> String {
        format!("direct-messages-{}", self.receiver_id)
    }

    fn validate(&self) -> Result<(), ConnectError> {
        if self.receiver_id.is_empty() {
            return Err(ConnectError::InvalidMessage(
                "receiverId is required".to_string(),
            ));
        }
        if self.receiver_id == self.base.sender_id {
            return Err(ConnectError::InvalidMessage(
                "sender and receiver must differ".to_string(),
            ));
        }
        Ok(())
    }

    fn from_wire(wire: &Map<String, Value>) -> Result<Self, ConnectError> {
        mapper::message::direct_from_wire(wire)
    }

    fn to_wire(&self) -> Map<String, Value> {
        mapper::message::direct_to_wire(self)
    }

    fn from_store(doc: &Document) -> Self {
        mapper::message::direct_from_store(doc)
    }

    fn to_store(&self) -> Document {
        mapper::message::direct_to_store(self)
    }
}

impl ChatMessage for GroupMessage {
    const KIND: &'static str = "group message";
    const COLLECTION: &'static str = collections::GROUP_MESSAGES;
    const EVENT: &'static str = events::NEW_GROUP_MESSAGE;

    fn base(&self) -> &BaseMessage {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseMessage {
        &mut self.base
    }

    fn topic(&self) -> String {
        match self.group_id.as_deref().filter(|g| !g.is_empty()) {
            Some(group_id) => format!("group-messages-{}-{}", self.project_id, group_id),
            None => format!("group-messages-{}", self.project_id),
        }
    }

    fn validate(&self) -> Result<(), ConnectError> {
        if self.project_id.is_empty() {
            return Err(ConnectError::InvalidMessage(
                "projectId is required".to_string(),
            ));
        }
        Ok(())
    }

    fn from_wire(wire: &Map<String, Value>) -> Result<Self, ConnectError> {
        mapper::message::group_from_wire(wire)
    }

    fn to_wire(&self) -> Map<String, Value> {
        mapper::message::group_to_wire(self)
    }

    fn from_store(doc: &Document) -> Self {
        mapper::message::group_from_store(doc)
    }

    fn to_store(&self) -> Document {
        mapper::message::group_to_store(self)
    }
}
