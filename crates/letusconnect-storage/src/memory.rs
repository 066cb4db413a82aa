// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use letusconnect_core::{
    AdapterType, ConnectError, Document, DocumentStore, HealthStatus, PluginAdapter,
};

/// Process-local store keyed by `(collection, id)`.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: DashMap<(String, String), Document>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.docs.iter().filter(|e| e.key().0 == collection).count()
    }
}

#[async_trait]
impl PluginAdapter for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, ConnectError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConnectError> {
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), ConnectError> {
        match self.docs.entry((collection.to_string(), id.to_string())) {
            Entry::Occupied(_) => Err(ConnectError::storage(format!(
                "document {collection}/{id} already exists"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
        }
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectError> {
        Ok(self
            .docs
            .get(&(collection.to_string(), id.to_string()))
            .map(|d| d.value().clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, ConnectError> {
        Ok(self
            .docs
            .remove(&(collection.to_string(), id.to_string()))
            .is_some())
    }
}
