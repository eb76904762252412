//! Filesystem data lake operations.
//!
//! Handles reading and writing the local data directory:
//! - Metric records entered through the data-entry form
//! - Team roster for the leaderboard
//! - Posts and campaigns for platform drilldowns

mod jsonl;
mod repository;

pub use jsonl::*;
pub use repository::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of the JSONL file holding one entity type.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
