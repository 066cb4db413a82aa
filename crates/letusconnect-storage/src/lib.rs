// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store adapters for the LetUsConnect backend.
//!
//! [`SqliteDocumentStore`] persists store-shape documents as JSON rows through
//! a single `tokio-rusqlite` writer thread with embedded migrations.
//! [`MemoryDocumentStore`] keeps them in a concurrent map for tests and
//! throwaway deployments.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use letusconnect_config::model::{StorageBackend, StorageConfig};
use letusconnect_core::{ConnectError, DocumentStore};
use tracing::info;

pub use database::Database;
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Open the store selected by configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>, ConnectError> {
    match config.backend {
        StorageBackend::Sqlite => {
            if let Some(parent) = std::path::Path::new(&config.database_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(ConnectError::storage)?;
            }
            let store = SqliteDocumentStore::open(&config.database_path).await?;
            info!(path = %config.database_path, "sqlite document store opened");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            info!("in-memory document store selected; documents are not persisted");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
