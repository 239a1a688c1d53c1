//! Database connection management with pragma configuration.
//!
//! This module handles opening SQLite databases, applying required pragmas
//! for performance and concurrency (WAL mode), and running migrations.

use super::migrations::{self, CACHE_MIGRATIONS, MigrationList};
use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the same connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a cache database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = open_with_migrations(path, CACHE_MIGRATIONS).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory cache database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = open_in_memory_with_migrations(CACHE_MIGRATIONS).await?;
        Ok(Self { conn })
    }
}

/// Open a file-backed connection, configure it, and migrate it.
pub(crate) async fn open_with_migrations(path: impl AsRef<Path>, migrations: MigrationList) -> Result<Connection, Error> {
    let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
    configure(&conn).await?;
    migrations::run(&conn, migrations).await?;
    Ok(conn)
}

/// Open an in-memory connection, configure it, and migrate it.
pub(crate) async fn open_in_memory_with_migrations(migrations: MigrationList) -> Result<Connection, Error> {
    let conn = Connection::open_in_memory()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    configure(&conn).await?;
    migrations::run(&conn, migrations).await?;
    Ok(conn)
}

async fn configure(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA foreign_keys=ON;",
        )?;
        Ok(())
    })
    .await
    .map_err(Error::Database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_open_file_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.sqlite");

        let db = CacheDb::open(&path).await.unwrap();
        drop(db);

        let reopened = CacheDb::open(&path).await.unwrap();
        let applied: i64 = reopened
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(applied, CACHE_MIGRATIONS.len() as i64);
    }
}
