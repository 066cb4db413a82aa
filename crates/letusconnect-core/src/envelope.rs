// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket frame envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured text frame exchanged over a session.
///
/// Missing keys decode to their zero values. `from` is rewritten by the
/// server before rebroadcast and is never trusted from the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Value,
    pub from: String,
    pub to: String,
    pub time: i64,
}

impl Envelope {
    /// Replace the claimed sender with the authenticated user id.
    pub fn stamp_sender(&mut self, user_id: &str) {
        self.from = user_id.to_string();
    }
}
