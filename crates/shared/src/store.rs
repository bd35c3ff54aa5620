//! Record sinks.
//!
//! A sink receives every completed document of a scrape run. Test mode writes
//! pretty JSON files, production mode inserts database rows; which one is used
//! is decided once from `output.developer_testing`.

use crate::models::{Record, ScrapeSession};
use crate::{Config, DataPaths, Database};
use anyhow::{Context, Result};
use tracing::debug;

/// Write target for completed records
pub trait Sink {
    /// Persist one record produced by `session`
    fn write(&mut self, session: &ScrapeSession, record: Record<'_>) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, session: &ScrapeSession, record: Record<'_>) -> Result<()> {
        (**self).write(session, record)
    }
}

/// Test-mode sink: one JSON file per source, sport and record kind
///
/// Each write replaces the file, so it holds the latest record of its kind.
pub struct JsonFileSink {
    paths: DataPaths,
}

impl JsonFileSink {
    pub fn new(paths: DataPaths) -> Result<Self> {
        paths.create_dirs()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }
}

impl Sink for JsonFileSink {
    fn write(&mut self, session: &ScrapeSession, record: Record<'_>) -> Result<()> {
        let path = self
            .paths
            .record_file(&session.source.name, &session.source_type, record.kind());

        let value = record.to_json().context("Failed to serialize record")?;
        let content = serde_json::to_string_pretty(&value).context("Failed to format record")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write record file: {}", path.display()))?;

        debug!(path = %path.display(), kind = record.kind().as_str(), "Record written");
        Ok(())
    }
}

/// Production sink backed by SQLite
pub struct DatabaseSink {
    db: Database,
}

impl DatabaseSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Sink for DatabaseSink {
    fn write(&mut self, session: &ScrapeSession, record: Record<'_>) -> Result<()> {
        let id = match record {
            Record::Match(m) => self.db.insert_match(session, m)?,
            Record::Metadata(meta) => self.db.insert_session(session, meta)?,
        };

        debug!(row_id = id, kind = record.kind().as_str(), "Record inserted");
        Ok(())
    }
}

/// Sink chosen from configuration
pub enum OutputSink {
    Files(JsonFileSink),
    Database(DatabaseSink),
}

impl OutputSink {
    /// Build the file sink when `developer_testing` is set, the database sink otherwise
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.output.developer_testing {
            let paths = DataPaths::new(config.testing_dir());
            Ok(OutputSink::Files(JsonFileSink::new(paths)?))
        } else {
            let db = Database::open(config.database_path()).context("Failed to open database")?;
            Ok(OutputSink::Database(DatabaseSink::new(db)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OutputSink::Files(sink) => format!("files ({})", sink.paths().root().display()),
            OutputSink::Database(_) => "database".to_string(),
        }
    }
}

impl Sink for OutputSink {
    fn write(&mut self, session: &ScrapeSession, record: Record<'_>) -> Result<()> {
        match self {
            OutputSink::Files(sink) => sink.write(session, record),
            OutputSink::Database(sink) => sink.write(session, record),
        }
    }
}
