// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapper for the [`GroupChat`] aggregate.

use serde_json::{Map, Value};

use super::fields::{self, StoreReader, StoreWriter, WireReader, WireWriter};
use crate::document::{Document, StoreValue};
use crate::error::ConnectError;
use crate::group_chat::{Creator, GroupChat, GroupSettings, Participant};

pub fn from_wire(wire: &Map<String, Value>) -> Result<GroupChat, ConnectError> {
    let r = WireReader::new(wire);

    let created_by = match r.object(fields::CREATED_BY)? {
        Some(c) => Creator {
            uid: c.string(fields::UID)?,
            name: c.string(fields::NAME)?,
        },
        None => Creator::default(),
    };

    let participants = r
        .objects(fields::PARTICIPANTS)?
        .iter()
        .map(|p| {
            Ok(Participant {
                user_id: p.string(fields::USER_ID)?,
                role: p.string(fields::ROLE)?,
                profile_pic: p.string(fields::PROFILE_PIC)?,
                username: p.string(fields::USERNAME)?,
                email: p.string(fields::EMAIL)?,
                joined_at: p.instant(fields::JOINED_AT)?,
            })
        })
        .collect::<Result<Vec<_>, ConnectError>>()?;

    let settings = match r.object(fields::SETTINGS)? {
        Some(s) => GroupSettings {
            allow_file_sharing: s.bool(fields::ALLOW_FILE_SHARING)?,
            allow_pinning: s.bool(fields::ALLOW_PINNING)?,
            allow_reactions: s.bool(fields::ALLOW_REACTIONS)?,
            allow_replies: s.bool(fields::ALLOW_REPLIES)?,
            mute_notifications: s.bool(fields::MUTE_NOTIFICATIONS)?,
            only_admins_can_post: s.bool(fields::ONLY_ADMINS_CAN_POST)?,
        },
        None => GroupSettings::default(),
    };

    Ok(GroupChat {
        id: r.string(fields::ID)?,
        project_id: r.string(fields::PROJECT_ID)?,
        created_by,
        name: r.string(fields::NAME)?,
        description: r.string(fields::DESCRIPTION)?,
        participants,
        pinned_messages: r.strings(fields::PINNED_MESSAGES)?,
        is_archived: r.bool(fields::IS_ARCHIVED)?,
        notification_preferences: r.bool_map(fields::NOTIFICATION_PREFERENCES)?,
        created_at: r.instant(fields::CREATED_AT)?,
        updated_at: r.instant(fields::UPDATED_AT)?,
        read_status: r.instant_map(fields::READ_STATUS)?,
        settings,
    })
}

pub fn to_wire(chat: &GroupChat) -> Map<String, Value> {
    let mut creator = WireWriter::default();
    creator
        .put(fields::UID, chat.created_by.uid.as_str())
        .put(fields::NAME, chat.created_by.name.as_str());

    let participants: Vec<Value> = chat
        .participants
        .iter()
        .map(|p| {
            let mut w = WireWriter::default();
            w.put(fields::USER_ID, p.user_id.as_str())
                .put(fields::ROLE, p.role.as_str())
                .put(fields::PROFILE_PIC, p.profile_pic.as_str())
                .put(fields::USERNAME, p.username.as_str())
                .put(fields::EMAIL, p.email.as_str())
                .put_instant(fields::JOINED_AT, &p.joined_at);
            Value::Object(w.finish())
        })
        .collect();

    let read_status: Map<String, Value> = chat
        .read_status
        .iter()
        .map(|(user, at)| (user.clone(), Value::String(fields::format_instant(at))))
        .collect();

    let s = &chat.settings;
    let mut settings = WireWriter::default();
    settings
        .put(fields::ALLOW_FILE_SHARING, s.allow_file_sharing)
        .put(fields::ALLOW_PINNING, s.allow_pinning)
        .put(fields::ALLOW_REACTIONS, s.allow_reactions)
        .put(fields::ALLOW_REPLIES, s.allow_replies)
        .put(fields::MUTE_NOTIFICATIONS, s.mute_notifications)
        .put(fields::ONLY_ADMINS_CAN_POST, s.only_admins_can_post);

    let mut w = WireWriter::default();
    w.put(fields::ID, chat.id.as_str())
        .put(fields::PROJECT_ID, chat.project_id.as_str())
        .put(fields::CREATED_BY, Value::Object(creator.finish()))
        .put(fields::NAME, chat.name.as_str())
        .put(fields::DESCRIPTION, chat.description.as_str())
        .put(fields::PARTICIPANTS, participants)
        .put(fields::PINNED_MESSAGES, chat.pinned_messages.clone())
        .put(fields::IS_ARCHIVED, chat.is_archived)
        .put_map(fields::NOTIFICATION_PREFERENCES, &chat.notification_preferences)
        .put_instant(fields::CREATED_AT, &chat.created_at)
        .put_instant(fields::UPDATED_AT, &chat.updated_at)
        .put(fields::READ_STATUS, Value::Object(read_status))
        .put(fields::SETTINGS, Value::Object(settings.finish()));
    w.finish()
}

pub fn from_store(doc: &Document) -> GroupChat {
    let r = StoreReader::new(doc);

    let created_by = r
        .map(fields::CREATED_BY)
        .map(|c| {
            let c = StoreReader::new(c);
            Creator {
                uid: c.string(fields::UID),
                name: c.string(fields::NAME),
            }
        })
        .unwrap_or_default();

    let participants = r
        .maps(fields::PARTICIPANTS)
        .into_iter()
        .map(|p| {
            let p = StoreReader::new(p);
            Participant {
                user_id: p.string(fields::USER_ID),
                role: p.string(fields::ROLE),
                profile_pic: p.string(fields::PROFILE_PIC),
                username: p.string(fields::USERNAME),
                email: p.string(fields::EMAIL),
                joined_at: p.instant(fields::JOINED_AT),
            }
        })
        .collect();

    let settings = r
        .map(fields::SETTINGS)
        .map(|s| {
            let s = StoreReader::new(s);
            GroupSettings {
                allow_file_sharing: s.bool(fields::ALLOW_FILE_SHARING),
                allow_pinning: s.bool(fields::ALLOW_PINNING),
                allow_reactions: s.bool(fields::ALLOW_REACTIONS),
                allow_replies: s.bool(fields::ALLOW_REPLIES),
                mute_notifications: s.bool(fields::MUTE_NOTIFICATIONS),
                only_admins_can_post: s.bool(fields::ONLY_ADMINS_CAN_POST),
            }
        })
        .unwrap_or_default();

    GroupChat {
        id: r.string(fields::ID),
        project_id: r.string(fields::PROJECT_ID),
        created_by,
        name: r.string(fields::NAME),
        description: r.string(fields::DESCRIPTION),
        participants,
        pinned_messages: r.strings(fields::PINNED_MESSAGES),
        is_archived: r.bool(fields::IS_ARCHIVED),
        notification_preferences: r.bool_map(fields::NOTIFICATION_PREFERENCES),
        created_at: r.instant(fields::CREATED_AT),
        updated_at: r.instant(fields::UPDATED_AT),
        read_status: r.instant_map(fields::READ_STATUS),
        settings,
    }
}

pub fn to_store(chat: &GroupChat) -> Document {
    let mut creator = StoreWriter::default();
    creator
        .put(fields::UID, chat.created_by.uid.as_str())
        .put(fields::NAME, chat.created_by.name.as_str());

    let participants: Vec<StoreValue> = chat
        .participants
        .iter()
        .map(|p| {
            let mut w = StoreWriter::default();
            w.put(fields::USER_ID, p.user_id.as_str())
                .put(fields::ROLE, p.role.as_str())
                .put(fields::PROFILE_PIC, p.profile_pic.as_str())
                .put(fields::USERNAME, p.username.as_str())
                .put(fields::EMAIL, p.email.as_str())
                .put(fields::JOINED_AT, p.joined_at);
            StoreValue::Map(w.finish())
        })
        .collect();

    let s = &chat.settings;
    let mut settings = StoreWriter::default();
    settings
        .put(fields::ALLOW_FILE_SHARING, s.allow_file_sharing)
        .put(fields::ALLOW_PINNING, s.allow_pinning)
        .put(fields::ALLOW_REACTIONS, s.allow_reactions)
        .put(fields::ALLOW_REPLIES, s.allow_replies)
        .put(fields::MUTE_NOTIFICATIONS, s.mute_notifications)
        .put(fields::ONLY_ADMINS_CAN_POST, s.only_admins_can_post);

    let mut w = StoreWriter::default();
    w.put(fields::ID, chat.id.as_str())
        .put(fields::PROJECT_ID, chat.project_id.as_str())
        .put(fields::CREATED_BY, StoreValue::Map(creator.finish()))
        .put(fields::NAME, chat.name.as_str())
        .put(fields::DESCRIPTION, chat.description.as_str())
        .put(fields::PARTICIPANTS, participants)
        .put(fields::PINNED_MESSAGES, chat.pinned_messages.clone())
        .put(fields::IS_ARCHIVED, chat.is_archived)
        .put(
            fields::NOTIFICATION_PREFERENCES,
            chat.notification_preferences.clone(),
        )
        .put(fields::CREATED_AT, chat.created_at)
        .put(fields::UPDATED_AT, chat.updated_at)
        .put(fields::READ_STATUS, chat.read_status.clone())
        .put(fields::SETTINGS, StoreValue::Map(settings.finish()));
    w.finish()
}
