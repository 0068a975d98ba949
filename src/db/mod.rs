// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data access layer.
//!
//! This module provides [`Db`], the execution handle every repository
//! operation runs through, together with schema creation.
//!
//! # Tables
//!
//! * `artists` - Artist names.
//! * `albums` - Album names linked to their album artist, `-2` for compilations.
//! * `genres` - Genre names.
//! * `tracks` - Individual audio files with metadata and listening statistics.
//! * `track_artists` - Many-to-many links between tracks and artists.
//! * `track_genres` - Many-to-many links between tracks and genres.
//!
//! # Transactions
//!
//! Writes issued through [`Db::execute`] open a deferred transaction when
//! none is active, so they remain pending until [`Db::commit`]. Reads on the
//! same handle observe pending writes; other handles do not.
//!
//! # Performance
//!
//! Statements are prepared with [`rusqlite::Connection::prepare_cached`] to
//! reduce SQL parsing overhead.

pub(crate) mod model;

use std::time::Duration;

use anyhow::{Context, bail};
use rusqlite::{Connection, Params};

use crate::{config::CatalogConfig, error::Result};

/// Execution handle over a single SQLite connection.
///
/// The handle is [`Send`] but not [`Sync`]: it can be handed to a worker
/// thread, but each thread needs a handle of its own.
#[derive(Debug)]
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Opens the catalogue database described by `config`.
    ///
    /// This function performs the following setup:
    /// * **WAL Mode**: Enables Write-Ahead Logging when `config.wal` is set.
    /// * **Performance Tuning**: Sets synchronous mode to `NORMAL` and the
    ///   configured cache size.
    /// * **Schema**: Creates all tables and indices that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The database file cannot be opened.
    /// * WAL mode was requested but could not be enabled.
    /// * The initial PRAGMA configurations fail.
    /// * The schema initialization fails.
    pub fn open(config: &CatalogConfig) -> anyhow::Result<Self> {
        let conn = Connection::open(&config.database_path).with_context(|| {
            format!(
                "Failed to open database {}",
                config.database_path.display()
            )
        })?;

        if config.wal {
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
            if journal_mode != "wal" {
                bail!(
                    "Failed to switch to WAL mode. Current mode: {}",
                    journal_mode
                );
            }
        }

        Self::configure(conn, config)
    }

    /// Opens a private in-memory database with default settings.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::configure(conn, &CatalogConfig::default())
    }

    fn configure(conn: Connection, config: &CatalogConfig) -> anyhow::Result<Self> {
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "cache_size", -config.cache_size_kib)?;
        // Track search matches names case-sensitively.
        conn.pragma_update(None, "case_sensitive_like", true)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.set_prepared_statement_cache_capacity(config.statement_cache_capacity);

        create_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Executes a write statement, opening a transaction first if none is
    /// pending.
    ///
    /// The write is not durable until [`Db::commit`] is called.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN DEFERRED")?;
        }
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.execute(params)?)
    }

    /// Commits all pending writes. Does nothing if no write is pending.
    pub fn commit(&self) -> Result<()> {
        if self.has_pending_writes() {
            self.conn.execute_batch("COMMIT")?;
            log::debug!("Committed pending writes");
        }
        Ok(())
    }

    /// Discards all pending writes.
    pub fn rollback(&self) -> Result<()> {
        if self.has_pending_writes() {
            self.conn.execute_batch("ROLLBACK")?;
            log::debug!("Rolled back pending writes");
        }
        Ok(())
    }

    pub fn has_pending_writes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    pub(crate) fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// The underlying connection, used for reads.
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Create the database schema.
///
/// No foreign key constraints are declared: child rows are deleted
/// explicitly before their parent, and link uniqueness is checked by the
/// repositories before insert.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
///
/// # Errors
///
/// Returns an error if the transaction fails, if there are permission issues
/// with the database file, or if the SQL syntax is invalid.
fn create_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            artist_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_albums_artist_id ON albums (artist_id);

        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            filepath TEXT NOT NULL UNIQUE,
            duration INTEGER NOT NULL DEFAULT 0,
            tracknumber INTEGER NOT NULL DEFAULT 0,
            discnumber INTEGER NOT NULL DEFAULT 0,
            album_id INTEGER NOT NULL,
            year INTEGER,
            popularity INTEGER NOT NULL DEFAULT 0,
            ltime INTEGER NOT NULL DEFAULT 0,
            mtime INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_tracks_album_id ON tracks (album_id);

        CREATE TABLE IF NOT EXISTS track_artists (
            track_id INTEGER NOT NULL,
            artist_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_track_artists_track_id ON track_artists (track_id);
        CREATE INDEX IF NOT EXISTS idx_track_artists_artist_id ON track_artists (artist_id);

        CREATE TABLE IF NOT EXISTS track_genres (
            track_id INTEGER NOT NULL,
            genre_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_track_genres_track_id ON track_genres (track_id);

        COMMIT;",
    )
    .context("Failed to create schema")?;

    log::debug!("Catalogue schema ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use rusqlite::params;

    use super::*;
    use crate::tests::*;

    fn track_count(db: &Db) -> rusqlite::Result<i64> {
        db.conn()
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))
    }

    #[test]
    fn writes_stay_pending_until_commit() -> TestResult<()> {
        let db = establish_db()?;
        assert!(!db.has_pending_writes());

        db.execute(
            "INSERT INTO tracks (name, filepath, album_id) VALUES (?, ?, ?)",
            params!["a", "/a.mp3", 1],
        )?;
        assert!(db.has_pending_writes());
        assert_eq!(track_count(&db)?, 1);

        db.commit()?;
        assert!(!db.has_pending_writes());
        assert_eq!(track_count(&db)?, 1);
        Ok(())
    }

    #[test]
    fn rollback_discards_pending_writes() -> TestResult<()> {
        let db = establish_db()?;
        db.execute(
            "INSERT INTO tracks (name, filepath, album_id) VALUES (?, ?, ?)",
            params!["a", "/a.mp3", 1],
        )?;
        db.rollback()?;
        assert_eq!(track_count(&db)?, 0);

        // Nothing pending, both are no-ops.
        db.commit()?;
        db.rollback()?;
        Ok(())
    }

    #[test]
    fn open_file_database_twice() -> TestResult<()> {
        let dir = tempfile::tempdir()?;
        let config = CatalogConfig {
            database_path: dir.path().join("catalogue.db"),
            ..CatalogConfig::default()
        };
        let first = Db::open(&config)?;
        let second = Db::open(&config)?;

        first.execute(
            "INSERT INTO tracks (name, filepath, album_id) VALUES (?, ?, ?)",
            params!["a", "/a.mp3", 1],
        )?;
        assert_eq!(track_count(&second)?, 0);

        first.commit()?;
        assert_eq!(track_count(&second)?, 1);
        Ok(())
    }
}
