// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store adapter trait.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::ConnectError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the persistent document store.
///
/// Documents are addressed by `(collection, id)` and carried in store shape.
#[async_trait]
pub trait DocumentStore: PluginAdapter {
    /// Inserts a new document. Fails if the id already exists in the collection.
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), ConnectError>;

    /// Fetches a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectError>;

    /// Deletes a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, ConnectError>;
}
