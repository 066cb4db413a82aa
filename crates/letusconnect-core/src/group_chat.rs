// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group chat aggregate.
//!
//! Aggregate timestamps are absolute instants, unlike per-message
//! timestamps which stay opaque strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::ConnectError;
use crate::mapper;

/// User who created the chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub uid: String,
    pub name: String,
}

/// A member of a group chat, in join order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub role: String,
    pub profile_pic: String,
    pub username: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
}

/// Per-chat feature toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    pub allow_file_sharing: bool,
    pub allow_pinning: bool,
    pub allow_reactions: bool,
    pub allow_replies: bool,
    pub mute_notifications: bool,
    pub only_admins_can_post: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChat {
    pub id: String,
    pub project_id: String,
    pub created_by: Creator,
    pub name: String,
    pub description: String,
    pub participants: Vec<Participant>,
    pub pinned_messages: Vec<String>,
    pub is_archived: bool,
    pub notification_preferences: BTreeMap<String, bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last-read instant per participant.
    pub read_status: BTreeMap<String, DateTime<Utc>>,
    pub settings: GroupSettings,
}

impl GroupChat {
    pub fn from_wire(wire: &Map<String, Value>) -> Result<Self, ConnectError> {
        mapper::group_chat::from_wire(wire)
    }

    pub fn to_wire(&self) -> Map<String, Value> {
        mapper::group_chat::to_wire(self)
    }

    pub fn from_store(doc: &Document) -> Self {
        mapper::group_chat::from_store(doc)
    }

    pub fn to_store(&self) -> Document {
        mapper::group_chat::to_store(self)
    }
}
