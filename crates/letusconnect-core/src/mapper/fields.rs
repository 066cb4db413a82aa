// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field table and typed readers/writers for the wire and store shapes.
//!
//! Each field is declared once as a [`Key`] pairing its camelCase wire name
//! with its snake_case store name. Readers substitute zero values for absent
//! or null keys. The wire reader rejects type-shape violations; the store
//! reader never fails.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{Document, StoreValue};
use crate::error::ConnectError;

/// One field's name in each keyed shape.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Key {
    pub wire: &'static str,
    pub store: &'static str,
}

const fn key(wire: &'static str, store: &'static str) -> Key {
    Key { wire, store }
}

pub(crate) const ID: Key = key("id", "id");
pub(crate) const SENDER_ID: Key = key("senderId", "sender_id");
pub(crate) const SENDER_NAME: Key = key("senderName", "sender_name");
pub(crate) const CONTENT: Key = key("content", "content");
pub(crate) const CREATED_AT: Key = key("createdAt", "created_at");
pub(crate) const UPDATED_AT: Key = key("updatedAt", "updated_at");
pub(crate) const READ_STATUS: Key = key("readStatus", "read_status");
pub(crate) const IS_DELETED: Key = key("isDeleted", "is_deleted");
pub(crate) const ATTACHMENTS: Key = key("attachments", "attachments");
pub(crate) const REACTIONS: Key = key("reactions", "reactions");
pub(crate) const MESSAGE_TYPE: Key = key("messageType", "message_type");
pub(crate) const REPLY_TO: Key = key("replyTo", "reply_to");
pub(crate) const IS_PINNED: Key = key("isPinned", "is_pinned");
pub(crate) const PRIORITY: Key = key("priority", "priority");
pub(crate) const RECEIVER_ID: Key = key("receiverId", "receiver_id");
pub(crate) const PROJECT_ID: Key = key("projectId", "project_id");
pub(crate) const GROUP_ID: Key = key("groupId", "group_id");

pub(crate) const CREATED_BY: Key = key("createdBy", "created_by");
pub(crate) const UID: Key = key("uid", "uid");
pub(crate) const NAME: Key = key("name", "name");
pub(crate) const DESCRIPTION: Key = key("description", "description");
pub(crate) const PARTICIPANTS: Key = key("participants", "participants");
pub(crate) const USER_ID: Key = key("userId", "user_id");
pub(crate) const ROLE: Key = key("role", "role");
pub(crate) const PROFILE_PIC: Key = key("profilePic", "profile_pic");
pub(crate) const USERNAME: Key = key("username", "username");
pub(crate) const EMAIL: Key = key("email", "email");
pub(crate) const JOINED_AT: Key = key("joinedAt", "joined_at");
pub(crate) const PINNED_MESSAGES: Key = key("pinnedMessages", "pinned_messages");
pub(crate) const IS_ARCHIVED: Key = key("isArchived", "is_archived");
pub(crate) const NOTIFICATION_PREFERENCES: Key =
    key("notificationPreferences", "notification_preferences");
pub(crate) const SETTINGS: Key = key("settings", "settings");
pub(crate) const ALLOW_FILE_SHARING: Key = key("allowFileSharing", "allow_file_sharing");
pub(crate) const ALLOW_PINNING: Key = key("allowPinning", "allow_pinning");
pub(crate) const ALLOW_REACTIONS: Key = key("allowReactions", "allow_reactions");
pub(crate) const ALLOW_REPLIES: Key = key("allowReplies", "allow_replies");
pub(crate) const MUTE_NOTIFICATIONS: Key = key("muteNotifications", "mute_notifications");
pub(crate) const ONLY_ADMINS_CAN_POST: Key = key("onlyAdminsCanPost", "only_admins_can_post");

/// RFC 3339 rendering used for every aggregate instant on the wire.
pub(crate) fn format_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn type_error(key: Key, expected: &'static str) -> ConnectError {
    ConnectError::FieldType {
        field: key.wire,
        expected,
    }
}

// --- wire (camelCase JSON) ---

/// Strict reader over a wire object.
pub(crate) struct WireReader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> WireReader<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn get(&self, key: Key) -> Option<&'a Value> {
        match self.map.get(key.wire) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    pub fn string(&self, key: Key) -> Result<String, ConnectError> {
        Ok(self.opt_string(key)?.unwrap_or_default())
    }

    pub fn opt_string(&self, key: Key) -> Result<Option<String>, ConnectError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(type_error(key, "a string")),
        }
    }

    pub fn bool(&self, key: Key) -> Result<bool, ConnectError> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(type_error(key, "a boolean")),
        }
    }

    pub fn strings(&self, key: Key) -> Result<Vec<String>, ConnectError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(type_error(key, "an array of strings")),
                })
                .collect(),
            Some(_) => Err(type_error(key, "an array of strings")),
        }
    }

    pub fn bool_map(&self, key: Key) -> Result<BTreeMap<String, bool>, ConnectError> {
        self.map_of(key, "an object of booleans", |v| v.as_bool())
    }

    pub fn count_map(&self, key: Key) -> Result<BTreeMap<String, i64>, ConnectError> {
        self.map_of(key, "an object of integers", |v| v.as_i64())
    }

    pub fn instant_map(&self, key: Key) -> Result<BTreeMap<String, DateTime<Utc>>, ConnectError> {
        self.map_of(key, "an object of RFC 3339 timestamps", |v| {
            v.as_str().and_then(parse_instant)
        })
    }

    /// Absolute instant encoded as an RFC 3339 string.
    pub fn instant(&self, key: Key) -> Result<DateTime<Utc>, ConnectError> {
        match self.get(key) {
            None => Ok(DateTime::<Utc>::default()),
            Some(Value::String(s)) => {
                parse_instant(s).ok_or_else(|| type_error(key, "an RFC 3339 timestamp"))
            }
            Some(_) => Err(type_error(key, "an RFC 3339 timestamp")),
        }
    }

    pub fn object(&self, key: Key) -> Result<Option<WireReader<'a>>, ConnectError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(WireReader::new(map))),
            Some(_) => Err(type_error(key, "an object")),
        }
    }

    pub fn objects(&self, key: Key) -> Result<Vec<WireReader<'a>>, ConnectError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(WireReader::new(map)),
                    _ => Err(type_error(key, "an array of objects")),
                })
                .collect(),
            Some(_) => Err(type_error(key, "an array of objects")),
        }
    }

    fn map_of<T>(
        &self,
        key: Key,
        expected: &'static str,
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Result<BTreeMap<String, T>, ConnectError> {
        match self.get(key) {
            None => Ok(BTreeMap::new()),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| {
                    convert(v)
                        .map(|t| (k.clone(), t))
                        .ok_or_else(|| type_error(key, expected))
                })
                .collect(),
            Some(_) => Err(type_error(key, expected)),
        }
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Builder for a wire object.
#[derive(Default)]
pub(crate) struct WireWriter {
    map: Map<String, Value>,
}

impl WireWriter {
    pub fn put(&mut self, key: Key, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key.wire.to_string(), value.into());
        self
    }

    /// Write only when present; absent stays unset.
    pub fn put_opt(&mut self, key: Key, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(v) = value {
            self.put(key, v);
        }
        self
    }

    pub fn put_instant(&mut self, key: Key, at: &DateTime<Utc>) -> &mut Self {
        self.put(key, format_instant(at))
    }

    pub fn put_map<T: Clone + Into<Value>>(
        &mut self,
        key: Key,
        map: &BTreeMap<String, T>,
    ) -> &mut Self {
        let obj: Map<String, Value> = map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect();
        self.put(key, Value::Object(obj))
    }

    pub fn finish(self) -> Map<String, Value> {
        self.map
    }
}

// --- store (snake_case document) ---

/// Lenient reader over a store document. Mismatched types read as zero values.
pub(crate) struct StoreReader<'a> {
    doc: &'a Document,
}

impl<'a> StoreReader<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    fn get(&self, key: Key) -> Option<&'a StoreValue> {
        match self.doc.get(key.store) {
            None | Some(StoreValue::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn mismatch(key: Key, found: &StoreValue) {
        debug!(field = key.store, ?found, "store field has unexpected type, using zero value");
    }

    pub fn string(&self, key: Key) -> String {
        self.opt_string(key).unwrap_or_default()
    }

    pub fn opt_string(&self, key: Key) -> Option<String> {
        match self.get(key)? {
            StoreValue::String(s) => Some(s.clone()),
            other => {
                Self::mismatch(key, other);
                None
            }
        }
    }

    pub fn bool(&self, key: Key) -> bool {
        match self.get(key) {
            None => false,
            Some(StoreValue::Bool(b)) => *b,
            Some(other) => {
                Self::mismatch(key, other);
                false
            }
        }
    }

    pub fn strings(&self, key: Key) -> Vec<String> {
        match self.get(key) {
            Some(StoreValue::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    StoreValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            Some(other) => {
                Self::mismatch(key, other);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn bool_map(&self, key: Key) -> BTreeMap<String, bool> {
        self.map_of(key, |v| match v {
            StoreValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn count_map(&self, key: Key) -> BTreeMap<String, i64> {
        self.map_of(key, |v| match v {
            StoreValue::Integer(n) => Some(*n),
            _ => None,
        })
    }

    pub fn instant_map(&self, key: Key) -> BTreeMap<String, DateTime<Utc>> {
        self.map_of(key, |v| match v {
            StoreValue::Timestamp(at) => Some(*at),
            _ => None,
        })
    }

    pub fn instant(&self, key: Key) -> DateTime<Utc> {
        match self.get(key) {
            None => DateTime::<Utc>::default(),
            Some(StoreValue::Timestamp(at)) => *at,
            Some(other) => {
                Self::mismatch(key, other);
                DateTime::<Utc>::default()
            }
        }
    }

    pub fn map(&self, key: Key) -> Option<&'a Document> {
        match self.get(key)? {
            StoreValue::Map(map) => Some(map),
            other => {
                Self::mismatch(key, other);
                None
            }
        }
    }

    pub fn maps(&self, key: Key) -> Vec<&'a Document> {
        match self.get(key) {
            Some(StoreValue::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    StoreValue::Map(map) => Some(map),
                    _ => None,
                })
                .collect(),
            Some(other) => {
                Self::mismatch(key, other);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn map_of<T>(&self, key: Key, convert: impl Fn(&StoreValue) -> Option<T>) -> BTreeMap<String, T> {
        match self.get(key) {
            Some(StoreValue::Map(map)) => map
                .iter()
                .filter_map(|(k, v)| convert(v).map(|t| (k.clone(), t)))
                .collect(),
            Some(other) => {
                Self::mismatch(key, other);
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        }
    }
}

/// Builder for a store document.
#[derive(Default)]
pub(crate) struct StoreWriter {
    doc: Document,
}

impl StoreWriter {
    pub fn put(&mut self, key: Key, value: impl Into<StoreValue>) -> &mut Self {
        self.doc.insert(key.store.to_string(), value.into());
        self
    }

    /// Write only when present; absent stays unset.
    pub fn put_opt(&mut self, key: Key, value: Option<impl Into<StoreValue>>) -> &mut Self {
        if let Some(v) = value {
            self.put(key, v);
        }
        self
    }

    pub fn finish(self) -> Document {
        self.doc
    }
}
