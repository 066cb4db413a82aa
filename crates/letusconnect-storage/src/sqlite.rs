// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DocumentStore trait.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use letusconnect_core::{
    AdapterType, ConnectError, Document, DocumentStore, HealthStatus, PluginAdapter,
};

use crate::database::{map_tr_err, Database};

/// SQLite-backed document store.
///
/// Each document is one row in `documents`, its body the JSON encoding of
/// the store-shape [`Document`] (native timestamps included).
pub struct SqliteDocumentStore {
    db: Database,
}

impl SqliteDocumentStore {
    /// Open the database file at `path`, running migrations.
    pub async fn open(path: &str) -> Result<Self, ConnectError> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, ConnectError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteDocumentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, ConnectError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConnectError> {
        self.db.checkpoint().await?;
        debug!("shutdown: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), ConnectError> {
        let body = serde_json::to_string(&doc).map_err(ConnectError::storage)?;
        let collection = collection.to_string();
        let id = id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                    params![collection, id, body],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectError> {
        let collection = collection.to_string();
        let id = id.to_string();
        let body = self
            .db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                let result = conn.query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get::<_, String>(0),
                );
                match result {
                    Ok(body) => Ok(Some(body)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)?;

        body.map(|b| serde_json::from_str(&b).map_err(ConnectError::storage))
            .transpose()
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, ConnectError> {
        let collection = collection.to_string();
        let id = id.to_string();
        let removed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                )
            })
            .await
            .map_err(map_tr_err)?;
        Ok(removed > 0)
    }
}
