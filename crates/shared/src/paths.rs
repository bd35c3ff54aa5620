//! File path utilities for test-mode output.
//!
//! Every record kind of a source/sport pair maps to one JSON file:
//! `{source}_{source_type}_{kind}.json`.

use crate::models::RecordKind;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File path manager for output files
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the given output directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the file name stem for a record kind
    pub fn record_key(source_name: &str, source_type: &str, kind: RecordKind) -> String {
        format!(
            "{}_{}_{}",
            source_name.to_lowercase(),
            source_type,
            kind.as_str()
        )
    }

    /// Get the JSON file a record kind is written to
    pub fn record_file(&self, source_name: &str, source_type: &str, kind: RecordKind) -> PathBuf {
        self.root
            .join(format!("{}.json", Self::record_key(source_name, source_type, kind)))
    }

    /// Create the output directory
    pub fn create_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory: {}", self.root.display()))
    }
}
