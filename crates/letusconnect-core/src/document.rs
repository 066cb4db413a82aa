// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store-shape documents.
//!
//! A [`Document`] is the snake_case field map written to the document store.
//! Unlike JSON it has a native [`StoreValue::Timestamp`] so aggregate
//! instants survive a write/read cycle without string formatting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field value inside a store document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoreValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<StoreValue>),
    Map(BTreeMap<String, StoreValue>),
}

/// Snake_case field map as persisted in a collection.
pub type Document = BTreeMap<String, StoreValue>;

impl From<bool> for StoreValue {
    fn from(v: bool) -> Self {
        StoreValue::Bool(v)
    }
}

impl From<i64> for StoreValue {
    fn from(v: i64) -> Self {
        StoreValue::Integer(v)
    }
}

impl From<String> for StoreValue {
    fn from(v: String) -> Self {
        StoreValue::String(v)
    }
}

impl From<&str> for StoreValue {
    fn from(v: &str) -> Self {
        StoreValue::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for StoreValue {
    fn from(v: DateTime<Utc>) -> Self {
        StoreValue::Timestamp(v)
    }
}

impl<T: Into<StoreValue>> From<Vec<T>> for StoreValue {
    fn from(v: Vec<T>) -> Self {
        StoreValue::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StoreValue>> From<BTreeMap<String, T>> for StoreValue {
    fn from(v: BTreeMap<String, T>) -> Self {
        StoreValue::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
