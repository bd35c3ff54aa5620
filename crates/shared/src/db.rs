//! Database operations for SQLite.
//!
//! This module handles the database connection, schema creation and the
//! inserts used by the production sink.

use crate::models::{MatchRecord, ScrapeSession, SessionMetadata};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
        }

        debug!(path = %path.display(), "Opening database");

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let db = Self { conn };
        db.create_schema()?;

        Ok(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    /// Create the database schema
    fn create_schema(&self) -> Result<()> {
        if self.get_version()? >= SCHEMA_VERSION {
            debug!("Database schema up to date");
            return Ok(());
        }

        self.conn
            .execute_batch(include_str!("../schema.sql"))
            .context("Failed to create database schema")?;
        self.set_version(SCHEMA_VERSION)?;

        info!(version = SCHEMA_VERSION, "Database schema created successfully");
        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Check if a table exists
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get the database version (from user_version pragma)
    pub fn get_version(&self) -> Result<i32> {
        let version: i32 = self.conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Set the database version
    pub fn set_version(&self, version: i32) -> Result<()> {
        self.conn
            .execute_batch(&format!("PRAGMA user_version = {}", version))?;
        Ok(())
    }

    /// Insert one match record, returning its row id
    pub fn insert_match(&self, session: &ScrapeSession, record: &MatchRecord) -> Result<i64> {
        let details = serde_json::to_string(&record.details)
            .context("Failed to serialize match details")?;

        self.conn
            .execute(
                "INSERT INTO match_records (
                    source_name, source_id, source_type, event_id,
                    match_name, kickoff_time, merge_key, event_link, details
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.source_ref.name,
                    record.source_ref.id,
                    session.source_type,
                    session.event_id as i64,
                    record.match_name,
                    record.kickoff_time,
                    record.merge_key,
                    record.canonical_link,
                    details,
                ],
            )
            .context("Failed to insert match record")?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert one session metadata row, returning its row id
    pub fn insert_session(&self, session: &ScrapeSession, meta: &SessionMetadata) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO scrape_sessions (
                    source_name, source_type, event_id, start_time, stop_time, duration
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    session.source.name,
                    session.source_type,
                    session.event_id as i64,
                    meta.start_time,
                    meta.stop_time,
                    meta.duration,
                ],
            )
            .context("Failed to insert session metadata")?;

        Ok(self.conn.last_insert_rowid())
    }
}
