//! Database schema migrations.
//!
//! Migrations are identified by name and applied in registration order. The
//! `_migrations` table records each name once it has been applied; a
//! recorded name is never run again.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{Connection, params, rusqlite};

use super::clock::{format_timestamp, parse_timestamp};
use super::Error;

/// A migration written in Rust rather than SQL.
pub type MigrationFn = fn(&rusqlite::Connection) -> Result<(), rusqlite::Error>;

/// What a migration does when applied.
#[derive(Clone, Copy)]
pub enum Procedure {
    /// A SQL batch. Must not contain its own `BEGIN`/`COMMIT`.
    Sql(&'static str),
    Code(MigrationFn),
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Sql(sql) => f.debug_tuple("Sql").field(&sql.len()).finish(),
            Procedure::Code(_) => f.write_str("Code(..)"),
        }
    }
}

impl Procedure {
    fn apply(&self, conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
        match self {
            Procedure::Sql(sql) => conn.execute_batch(sql),
            Procedure::Code(f) => f(conn),
        }
    }
}

/// A named schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub procedure: Procedure,
}

impl Migration {
    pub const fn sql(name: &'static str, sql: &'static str) -> Self {
        Self { name, procedure: Procedure::Sql(sql) }
    }

    pub const fn code(name: &'static str, f: MigrationFn) -> Self {
        Self { name, procedure: Procedure::Code(f) }
    }
}

/// Register `migrations/<name>.sql` under `<name>`.
///
/// Deriving the file from the name keeps registered names and file names
/// from drifting apart.
macro_rules! sql_migration {
    ($name:literal) => {
        Migration::sql($name, include_str!(concat!("../../migrations/", $name, ".sql")))
    };
}

/// Schema migrations for the response cache, in application order.
///
/// All migrations are idempotent using `IF NOT EXISTS`.
pub const MIGRATIONS: &[Migration] =
    &[sql_migration!("001_cached_response"), sql_migration!("002_cached_response_inserted_at")];

/// A row of the `_migrations` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MigrationRecord {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Run any pending migrations from `migrations`.
///
/// Creates the `_migrations` table if needed, skips names already recorded,
/// and applies the rest in the given order. Each migration runs in its own
/// transaction together with the insert that records it.
///
/// Returns the names applied by this call.
///
/// # Errors
///
/// Returns `Error::MigrationFailed` for the first migration that fails. That
/// migration is rolled back and not recorded, and later migrations are not
/// attempted.
pub async fn run(conn: &Connection, migrations: &[Migration]) -> Result<Vec<&'static str>, Error> {
    let migrations = migrations.to_vec();
    conn.call(move |conn| -> Result<Vec<&'static str>, Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY NOT NULL,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let recorded: HashSet<String> = {
            let mut stmt = conn.prepare("SELECT name FROM _migrations")?;
            stmt.query_map([], |row| row.get(0))?
                .collect::<Result<_, rusqlite::Error>>()?
        };

        let mut applied = Vec::new();
        for migration in &migrations {
            if recorded.contains(migration.name) {
                continue;
            }

            let tx = conn.transaction()?;
            migration
                .procedure
                .apply(&tx)
                .map_err(|e| Error::MigrationFailed { name: migration.name.to_string(), reason: e.to_string() })?;
            tx.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES (?1, ?2)",
                params![migration.name, format_timestamp(Utc::now())],
            )?;
            tx.commit()?;

            tracing::info!(migration = migration.name, "applied migration");
            applied.push(migration.name);
        }

        Ok(applied)
    })
    .await
    .map_err(Error::from)
}

/// Run pending migrations, failing if they take longer than `timeout`.
///
/// A migration already executing is not interrupted; the caller just stops
/// waiting for it. Startup is expected to abort on this error.
pub async fn run_with_timeout(
    conn: &Connection, migrations: &[Migration], timeout: Duration,
) -> Result<Vec<&'static str>, Error> {
    tokio::time::timeout(timeout, run(conn, migrations))
        .await
        .map_err(|_| Error::MigrationTimeout(timeout))?
}

/// List recorded migrations in the order they were applied.
pub async fn applied(conn: &Connection) -> Result<Vec<MigrationRecord>, Error> {
    conn.call(|conn| -> Result<Vec<MigrationRecord>, Error> {
        let mut stmt = conn.prepare("SELECT name, applied_at FROM _migrations ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        rows.into_iter()
            .map(|(name, applied_at)| Ok(MigrationRecord { name, applied_at: parse_timestamp(&applied_at)? }))
            .collect()
    })
    .await
    .map_err(Error::from)
}
