//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying the pragmas for
//! the configured durability level, and running migrations.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use super::migrations::{self, MigrationRecord};
use crate::Error;

/// How hard SQLite works to keep committed entries across crashes.
///
/// `Off` keeps the journal in memory and skips fsync; a crash mid-write can
/// leave the file unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// WAL with an fsync on every commit.
    Full,
    /// WAL, fsync at checkpoints. Survives process crashes; may lose the most
    /// recent commits on power loss.
    #[default]
    Normal,
    /// Unlogged: in-memory rollback journal and no fsync. A crash mid-write
    /// can leave the file unusable, in which case it should be deleted.
    Off,
}

impl Durability {
    fn pragmas(self) -> &'static str {
        match self {
            Durability::Full => "PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;",
            Durability::Normal => "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;",
            Durability::Off => "PRAGMA journal_mode=MEMORY; PRAGMA synchronous=OFF;",
        }
    }
}

/// Options applied when opening a [`CacheDb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub durability: Durability,
    /// Upper bound on how long startup waits for migrations.
    pub migration_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { durability: Durability::default(), migration_timeout: Duration::from_secs(30) }
    }
}

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Statements from all clones are serialised on that
/// thread, so each write is visible to every read issued after it completes.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a database at the specified path with default options.
    ///
    /// Creates the file if it doesn't exist, applies pragmas, and runs any
    /// pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(path, StoreOptions::default()).await
    }

    /// Open a database at the specified path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, or with `MigrationFailed` /
    /// `MigrationTimeout` if the schema cannot be brought up to date.
    pub async fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn, options).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn, StoreOptions::default()).await
    }

    async fn prepare(conn: Connection, options: StoreOptions) -> Result<Self, Error> {
        let pragmas = options.durability.pragmas();
        conn.call(move |conn| {
            conn.execute_batch(pragmas)?;
            conn.execute_batch(
                "PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        let applied = migrations::run_with_timeout(&conn, migrations::MIGRATIONS, options.migration_timeout).await?;
        tracing::debug!(durability = ?options.durability, applied = applied.len(), "cache database ready");

        Ok(Self { conn })
    }

    /// Migrations recorded in this database, oldest first.
    pub async fn applied_migrations(&self) -> Result<Vec<MigrationRecord>, Error> {
        migrations::applied(&self.conn).await
    }
}
