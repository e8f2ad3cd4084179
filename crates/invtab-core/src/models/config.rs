//! Configuration structures for the ingestion collaborators.
//!
//! The extraction core takes no configuration; these sections are handed to
//! collaborator constructors and mapped onto extractor builder options by the
//! caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::InvtabError;
use crate::invoice::{ShortRowPolicy, TableMode};

/// Main configuration for the invtab pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvtabConfig {
    /// Object storage configuration.
    pub storage: StorageConfig,

    /// Document analysis configuration.
    pub analysis: AnalysisConfig,

    /// Extraction behaviour.
    pub extraction: ExtractionConfig,

    /// Persistence configuration.
    pub database: DatabaseConfig,
}

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per bucket.
    pub root: PathBuf,

    /// Bucket uploads are written to.
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
            bucket: "invoices".to_string(),
        }
    }
}

/// Document analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding analysis responses named `<file stem>.json`.
    /// When unset, the directory of the uploaded file is used.
    pub response_dir: Option<PathBuf>,
}

/// Extraction behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How cells of several structured tables are combined.
    pub table_mode: TableMode,

    /// What to do with a trailing row shorter than the header.
    pub short_rows: ShortRowPolicy,
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("invtab.db"),
        }
    }
}

impl InvtabConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject settings the collaborators cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let bucket = self.storage.bucket.trim();
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == ".." {
            return Err(InvtabError::Config(format!(
                "invalid storage bucket {:?}",
                self.storage.bucket
            )));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(InvtabError::Config("database path is empty".to_string()));
        }
        Ok(())
    }

    /// Directory to look up analysis responses in for an uploaded file.
    pub fn response_dir_for(&self, upload: &std::path::Path) -> PathBuf {
        self.analysis.response_dir.clone().unwrap_or_else(|| {
            upload
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}
