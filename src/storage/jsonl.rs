//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for entered data.
//! Each line is a valid JSON object representing one entity.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Record,
    TeamMember,
    Post,
    Campaign,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Record => "records.jsonl",
            EntityType::TeamMember => "team.jsonl",
            EntityType::Post => "posts.jsonl",
            EntityType::Campaign => "campaigns.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file.
    ///
    /// A missing file reads as empty. Lines that fail to parse are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        idx + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Collapse entities sharing an id: the last occurrence wins, first-seen order is kept.
pub fn dedup_by_id<T, F>(entities: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(entities.len());

    for entity in entities {
        let key = id(&entity).to_string();
        match slots.get(&key) {
            Some(&slot) => out[slot] = entity,
            None => {
                slots.insert(key, out.len());
                out.push(entity);
            }
        }
    }

    out
}
