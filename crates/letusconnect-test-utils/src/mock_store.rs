// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store with an injectable failure switch.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use letusconnect_core::{
    AdapterType, ConnectError, Document, DocumentStore, HealthStatus, PluginAdapter,
};
use letusconnect_storage::MemoryDocumentStore;

/// Wraps [`MemoryDocumentStore`] so tests can force write failures.
#[derive(Default)]
pub struct MockStore {
    inner: MemoryDocumentStore,
    failing: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent inserts fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Documents currently held in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.inner.count(collection)
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, ConnectError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), ConnectError> {
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), ConnectError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConnectError::storage("mock store is failing"));
        }
        self.inner.insert(collection, id, doc).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectError> {
        self.inner.get(collection, id).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, ConnectError> {
        self.inner.delete(collection, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_insert_writes_nothing() {
        let store = MockStore::new();
        store.set_failing(true);
        assert!(store.insert("c", "1", Document::new()).await.is_err());
        assert_eq!(store.count("c"), 0);

        store.set_failing(false);
        store.insert("c", "1", Document::new()).await.unwrap();
        assert_eq!(store.count("c"), 1);
    }
}
