// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests: wire and store conversions compose to identity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use letusconnect_core::{
    BaseMessage, ChatMessage, Creator, DirectMessage, GroupChat, GroupMessage, GroupSettings,
    Participant,
};
use proptest::prelude::*;

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap_or_default())
}

fn base_message() -> impl Strategy<Value = BaseMessage> {
    (
        (
            "[a-z0-9-]{0,12}",
            "u[0-9]{1,3}",
            ".{0,16}",
            ".{0,40}",
            ".{0,30}",
            proptest::option::of(".{0,30}"),
        ),
        (
            proptest::collection::btree_map("u[0-9]{1,3}", any::<bool>(), 0..4),
            any::<bool>(),
            proptest::collection::vec("https://[a-z]{1,8}\\.test/[a-z]{1,8}", 0..3),
            proptest::collection::btree_map(".{1,4}", any::<i64>(), 0..4),
            "text|image|file",
            proptest::option::of("[a-z0-9]{1,8}"),
            any::<bool>(),
            "low|normal|high",
        ),
    )
        .prop_map(
            |(
                (id, sender_id, sender_name, content, created_at, updated_at),
                (read_status, is_deleted, attachments, reactions, message_type, reply_to, is_pinned, priority),
            )| BaseMessage {
                id,
                sender_id,
                sender_name,
                content,
                created_at,
                updated_at,
                read_status,
                is_deleted,
                attachments,
                reactions,
                message_type,
                reply_to,
                is_pinned,
                priority,
            },
        )
}

fn group_message() -> impl Strategy<Value = GroupMessage> {
    (
        base_message(),
        "p[0-9]{0,3}",
        proptest::option::of("g[0-9]{0,3}"),
    )
        .prop_map(|(base, project_id, group_id)| GroupMessage {
            base,
            project_id,
            group_id,
        })
}

fn direct_message() -> impl Strategy<Value = DirectMessage> {
    (base_message(), "u[0-9]{1,3}")
        .prop_map(|(base, receiver_id)| DirectMessage { base, receiver_id })
}

fn participant() -> impl Strategy<Value = Participant> {
    (
        "u[0-9]{1,3}",
        "admin|member",
        ".{0,20}",
        "[a-z]{0,10}",
        "[a-z]{1,6}@[a-z]{1,6}\\.test",
        instant(),
    )
        .prop_map(
            |(user_id, role, profile_pic, username, email, joined_at)| Participant {
                user_id,
                role,
                profile_pic,
                username,
                email,
                joined_at,
            },
        )
}

fn group_chat() -> impl Strategy<Value = GroupChat> {
    (
        ("c[0-9]{0,4}", "p[0-9]{0,3}", "u[0-9]{1,3}", ".{0,12}", ".{0,16}", ".{0,40}"),
        (
            proptest::collection::vec(participant(), 0..4),
            proptest::collection::vec("[a-z0-9]{1,8}", 0..3),
            any::<bool>(),
            proptest::collection::btree_map("[a-z]{1,8}", any::<bool>(), 0..3),
            instant(),
            instant(),
            proptest::collection::btree_map("u[0-9]{1,3}", instant(), 0..3),
            any::<[bool; 6]>(),
        ),
    )
        .prop_map(
            |(
                (id, project_id, uid, creator_name, name, description),
                (participants, pinned_messages, is_archived, notification_preferences, created_at, updated_at, read_status, s),
            )| GroupChat {
                id,
                project_id,
                created_by: Creator {
                    uid,
                    name: creator_name,
                },
                name,
                description,
                participants,
                pinned_messages,
                is_archived,
                notification_preferences,
                created_at,
                updated_at,
                read_status,
                settings: GroupSettings {
                    allow_file_sharing: s[0],
                    allow_pinning: s[1],
                    allow_reactions: s[2],
                    allow_replies: s[3],
                    mute_notifications: s[4],
                    only_admins_can_post: s[5],
                },
            },
        )
}

proptest! {
    #[test]
    fn group_message_store_round_trip(msg in group_message()) {
        prop_assert_eq!(GroupMessage::from_store(&msg.to_store()), msg);
    }

    #[test]
    fn group_message_wire_round_trip(msg in group_message()) {
        prop_assert_eq!(GroupMessage::from_wire(&msg.to_wire()).unwrap(), msg);
    }

    #[test]
    fn direct_message_store_round_trip(msg in direct_message()) {
        prop_assert_eq!(DirectMessage::from_store(&msg.to_store()), msg);
    }

    #[test]
    fn direct_message_wire_round_trip(msg in direct_message()) {
        prop_assert_eq!(DirectMessage::from_wire(&msg.to_wire()).unwrap(), msg);
    }

    #[test]
    fn group_chat_round_trips(chat in group_chat()) {
        prop_assert_eq!(&GroupChat::from_store(&chat.to_store()), &chat);
        prop_assert_eq!(&GroupChat::from_wire(&chat.to_wire()).unwrap(), &chat);
    }
}

#[test]
fn null_optionals_stay_absent_through_store() {
    let msg = GroupMessage {
        project_id: "p1".into(),
        group_id: None,
        ..Default::default()
    };
    let doc = msg.to_store();
    assert!(!doc.contains_key("group_id"));
    assert!(!doc.contains_key("updated_at"));
    assert!(!doc.contains_key("reply_to"));
    assert_eq!(GroupMessage::from_store(&doc), msg);
}

#[test]
fn missing_wire_keys_map_to_zero_values() {
    let wire = serde_json::Map::new();
    let msg = DirectMessage::from_wire(&wire).unwrap();
    assert_eq!(msg, DirectMessage::default());

    let chat = GroupChat::from_wire(&wire).unwrap();
    assert_eq!(chat.read_status, BTreeMap::new());
    assert_eq!(chat.created_at, DateTime::<Utc>::default());
}
