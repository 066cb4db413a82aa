// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapper for [`DirectMessage`] and [`GroupMessage`].
//!
//! Per-message `created_at`/`updated_at` travel as strings in every shape.

use serde_json::{Map, Value};

use super::fields::{self, StoreReader, StoreWriter, WireReader, WireWriter};
use crate::document::Document;
use crate::error::ConnectError;
use crate::message::{BaseMessage, DirectMessage, GroupMessage};

fn base_from_wire(r: &WireReader<'_>) -> Result<BaseMessage, ConnectError> {
    Ok(BaseMessage {
        id: r.string(fields::ID)?,
        sender_id: r.string(fields::SENDER_ID)?,
        sender_name: r.string(fields::SENDER_NAME)?,
        content: r.string(fields::CONTENT)?,
        created_at: r.string(fields::CREATED_AT)?,
        updated_at: r.opt_string(fields::UPDATED_AT)?,
        read_status: r.bool_map(fields::READ_STATUS)?,
        is_deleted: r.bool(fields::IS_DELETED)?,
        attachments: r.strings(fields::ATTACHMENTS)?,
        reactions: r.count_map(fields::REACTIONS)?,
        message_type: r.string(fields::MESSAGE_TYPE)?,
        reply_to: r.opt_string(fields::REPLY_TO)?,
        is_pinned: r.bool(fields::IS_PINNED)?,
        priority: r.string(fields::PRIORITY)?,
    })
}

fn base_to_wire(base: &BaseMessage, w: &mut WireWriter) {
    w.put(fields::ID, base.id.as_str())
        .put(fields::SENDER_ID, base.sender_id.as_str())
        .put(fields::SENDER_NAME, base.sender_name.as_str())
        .put(fields::CONTENT, base.content.as_str())
        .put(fields::CREATED_AT, base.created_at.as_str())
        .put_opt(fields::UPDATED_AT, base.updated_at.clone())
        .put_map(fields::READ_STATUS, &base.read_status)
        .put(fields::IS_DELETED, base.is_deleted)
        .put(fields::ATTACHMENTS, base.attachments.clone())
        .put_map(fields::REACTIONS, &base.reactions)
        .put(fields::MESSAGE_TYPE, base.message_type.as_str())
        .put_opt(fields::REPLY_TO, base.reply_to.clone())
        .put(fields::IS_PINNED, base.is_pinned)
        .put(fields::PRIORITY, base.priority.as_str());
}

fn base_from_store(r: &StoreReader<'_>) -> BaseMessage {
    BaseMessage {
        id: r.string(fields::ID),
        sender_id: r.string(fields::SENDER_ID),
        sender_name: r.string(fields::SENDER_NAME),
        content: r.string(fields::CONTENT),
        created_at: r.string(fields::CREATED_AT),
        updated_at: r.opt_string(fields::UPDATED_AT),
        read_status: r.bool_map(fields::READ_STATUS),
        is_deleted: r.bool(fields::IS_DELETED),
        attachments: r.strings(fields::ATTACHMENTS),
        reactions: r.count_map(fields::REACTIONS),
        message_type: r.string(fields::MESSAGE_TYPE),
        reply_to: r.opt_string(fields::REPLY_TO),
        is_pinned: r.bool(fields::IS_PINNED),
        priority: r.string(fields::PRIORITY),
    }
}

fn base_to_store(base: &BaseMessage, w: &mut StoreWriter) {
    w.put(fields::ID, base.id.as_str())
        .put(fields::SENDER_ID, base.sender_id.as_str())
        .put(fields::SENDER_NAME, base.sender_name.as_str())
        .put(fields::CONTENT, base.content.as_str())
        .put(fields::CREATED_AT, base.created_at.as_str())
        .put_opt(fields::UPDATED_AT, base.updated_at.clone())
        .put(fields::READ_STATUS, base.read_status.clone())
        .put(fields::IS_DELETED, base.is_deleted)
        .put(fields::ATTACHMENTS, base.attachments.clone())
        .put(fields::REACTIONS, base.reactions.clone())
        .put(fields::MESSAGE_TYPE, base.message_type.as_str())
        .put_opt(fields::REPLY_TO, base.reply_to.clone())
        .put(fields::IS_PINNED, base.is_pinned)
        .put(fields::PRIORITY, base.priority.as_str());
}

pub fn direct_from_wire(wire: &Map<String, Value>) -> Result<DirectMessage, ConnectError> {
    let r = WireReader::new(wire);
    Ok(DirectMessage {
        base: base_from_wire(&r)?,
        receiver_id: r.string(fields::RECEIVER_ID)?,
    })
}

pub fn direct_to_wire(msg: &DirectMessage) -> Map<String, Value> {
    let mut w = WireWriter::default();
    base_to_wire(&msg.base, &mut w);
    w.put(fields::RECEIVER_ID, msg.receiver_id.as_str());
    w.finish()
}

pub fn direct_from_store(doc: &Document) -> DirectMessage {
    let r = StoreReader::new(doc);
    DirectMessage {
        base: base_from_store(&r),
        receiver_id: r.string(fields::RECEIVER_ID),
    }
}

pub fn direct_to_store(msg: &DirectMessage) -> Document {
    let mut w = StoreWriter::default();
    base_to_store(&msg.base, &mut w);
    w.put(fields::RECEIVER_ID, msg.receiver_id.as_str());
    w.finish()
}

pub fn group_from_wire(wire: &Map<String, Value>) -> Result<GroupMessage, ConnectError> {
    let r = WireReader::new(wire);
    Ok(GroupMessage {
        base: base_from_wire(&r)?,
        project_id: r.string(fields::PROJECT_ID)?,
        group_id: r.opt_string(fields::GROUP_ID)?,
    })
}

pub fn group_to_wire(msg: &GroupMessage) -> Map<String, Value> {
    let mut w = WireWriter::default();
    base_to_wire(&msg.base, &mut w);
    w.put(fields::PROJECT_ID, msg.project_id.as_str())
        .put_opt(fields::GROUP_ID, msg.group_id.clone());
    w.finish()
}

pub fn group_from_store(doc: &Document) -> GroupMessage {
    let r = StoreReader::new(doc);
    GroupMessage {
        base: base_from_store(&r),
        project_id: r.string(fields::PROJECT_ID),
        group_id: r.opt_string(fields::GROUP_ID),
    }
}

pub fn group_to_store(msg: &GroupMessage) -> Document {
    let mut w = StoreWriter::default();
    base_to_store(&msg.base, &mut w);
    w.put(fields::PROJECT_ID, msg.project_id.as_str())
        .put_opt(fields::GROUP_ID, msg.group_id.clone());
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StoreValue;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn direct_wire_body_maps_to_internal() {
        let wire = obj(json!({
            "senderId": "u1",
            "receiverId": "u2",
            "content": "hi",
            "messageType": "text",
            "readStatus": {},
            "isDeleted": false,
            "isPinned": false,
            "priority": "normal",
            "createdAt": "2024-01-01T00:00:00Z"
        }));
        let msg = direct_from_wire(&wire).unwrap();
        assert_eq!(msg.base.sender_id, "u1");
        assert_eq!(msg.receiver_id, "u2");
        assert_eq!(msg.base.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(msg.base.id, "");
        assert!(msg.base.attachments.is_empty());
        assert_eq!(msg.base.reply_to, None);
    }

    #[test]
    fn created_at_is_carried_verbatim() {
        let wire = obj(json!({"createdAt": "2024-01-01T00:00:00.123456789+02:00"}));
        let msg = group_from_wire(&wire).unwrap();
        let store = group_to_store(&msg);
        assert_eq!(
            store.get("created_at"),
            Some(&StoreValue::String(
                "2024-01-01T00:00:00.123456789+02:00".into()
            ))
        );
        assert_eq!(
            group_to_wire(&msg)["createdAt"],
            "2024-01-01T00:00:00.123456789+02:00"
        );
    }

    #[test]
    fn wrong_type_fails_wire_mapping() {
        let wire = obj(json!({"senderId": 42}));
        let err = direct_from_wire(&wire).unwrap_err();
        assert!(matches!(
            err,
            ConnectError::FieldType {
                field: "senderId",
                ..
            }
        ));
    }

    #[test]
    fn store_uses_snake_case_keys() {
        let mut msg = GroupMessage {
            project_id: "p1".into(),
            group_id: Some("g1".into()),
            ..Default::default()
        };
        msg.base.sender_id = "u1".into();
        msg.base.reactions.insert("👍".into(), 3);
        let doc = group_to_store(&msg);
        assert!(doc.contains_key("sender_id"));
        assert!(doc.contains_key("project_id"));
        assert!(doc.contains_key("group_id"));
        assert!(!doc.contains_key("reply_to"));
        assert!(!doc.contains_key("senderId"));
        assert_eq!(group_from_store(&doc), msg);
    }

    #[test]
    fn absent_group_id_stays_absent() {
        let msg = GroupMessage {
            project_id: "p1".into(),
            ..Default::default()
        };
        let wire = group_to_wire(&msg);
        assert!(!wire.contains_key("groupId"));
        assert_eq!(group_from_wire(&wire).unwrap().group_id, None);
    }
}
