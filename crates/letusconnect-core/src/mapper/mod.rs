// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversions between the wire, internal, and store shapes.
//!
//! Wire objects use camelCase keys with RFC 3339 timestamps. Store documents
//! use snake_case keys with native timestamps. Both directions are driven by
//! the shared field table in [`fields`].
//!
//! Absent keys map to zero values in every direction. Only the wire reader
//! can fail, and only on a type-shape violation.

mod fields;
pub mod group_chat;
pub mod message;
