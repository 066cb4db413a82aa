// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use letusconnect_core::ConnectError;
use tracing::debug;

use crate::migrations;

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs and migrations.
    pub async fn open(path: &str) -> Result<Self, ConnectError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| ConnectError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(true).await?;
        debug!(path, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database. WAL is not available here.
    pub async fn open_in_memory() -> Result<Self, ConnectError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| ConnectError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal: bool) -> Result<(), ConnectError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal {
                    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
                }
                conn.execute_batch(
                    "PRAGMA synchronous = NORMAL;
                     PRAGMA busy_timeout = 5000;
                     PRAGMA foreign_keys = ON;",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| -> Result<(), refinery::Error> { migrations::run_migrations(conn) })
            .await
            .map_err(|e| ConnectError::storage(format!("migration failed: {e}")))?;
        Ok(())
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), ConnectError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ConnectError {
    ConnectError::Storage {
        source: Box::new(e),
    }
}
