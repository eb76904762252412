//! Data sources behind the dashboard.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{dedup_by_id, EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::calculate::FilterCriteria;
use crate::ingest::validate_record;
use crate::models::{Campaign, MetricPoint, MetricRecord, Post, TeamMember};

/// Everything the dashboard reads, loaded in one piece.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<MetricRecord>,
    pub team: Vec<TeamMember>,
    pub posts: Vec<Post>,
    pub campaigns: Vec<Campaign>,
}

/// A source of metric records and the entities around them.
pub trait MetricsRepository {
    fn records(&self) -> Result<Vec<MetricRecord>, StorageError>;

    fn team(&self) -> Result<Vec<TeamMember>, StorageError>;

    fn posts(&self) -> Result<Vec<Post>, StorageError>;

    fn campaigns(&self) -> Result<Vec<Campaign>, StorageError>;

    /// Points of every record matching `criteria`, in record order.
    fn query(&self, criteria: &FilterCriteria) -> Result<Vec<MetricPoint>, StorageError> {
        let points: Vec<MetricPoint> = self
            .records()?
            .iter()
            .filter(|record| criteria.matches(*record))
            .flat_map(MetricRecord::points)
            .collect();
        debug!("Query matched {} points", points.len());
        Ok(points)
    }
}

/// Repository backed by JSONL files in the data directory.
#[derive(Debug, Clone)]
pub struct JsonlRepository {
    config: StorageConfig,
}

impl JsonlRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Insert a record, replacing any earlier record with the same id.
    ///
    /// Returns `true` when an existing record was replaced.
    pub fn add_record(&self, record: &MetricRecord) -> Result<bool, StorageError> {
        let mut records = self.records()?;

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                JsonlWriter::for_entity(&self.config, EntityType::Record).write_all(&records)?;
                info!("Replaced record {}", record.id);
                Ok(true)
            }
            None => {
                JsonlWriter::for_entity(&self.config, EntityType::Record).append(record)?;
                info!("Added record {}", record.id);
                Ok(false)
            }
        }
    }

    /// Replace every entity file with the contents of `dataset`.
    pub fn seed(&self, dataset: &Dataset) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Record).write_all(&dataset.records)?;
        JsonlWriter::for_entity(&self.config, EntityType::TeamMember).write_all(&dataset.team)?;
        JsonlWriter::for_entity(&self.config, EntityType::Post).write_all(&dataset.posts)?;
        JsonlWriter::for_entity(&self.config, EntityType::Campaign)
            .write_all(&dataset.campaigns)?;
        info!("Seeded data directory {:?}", self.config.data_dir);
        Ok(())
    }
}

impl MetricsRepository for JsonlRepository {
    fn records(&self) -> Result<Vec<MetricRecord>, StorageError> {
        let records: Vec<MetricRecord> =
            JsonlReader::for_entity(&self.config, EntityType::Record).read_all()?;
        let valid = records
            .into_iter()
            .filter(|record| match validate_record(record) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping invalid record {}: {}", record.id, e);
                    false
                }
            })
            .collect();
        Ok(dedup_by_id(valid, |r| r.id.as_str()))
    }

    fn team(&self) -> Result<Vec<TeamMember>, StorageError> {
        let team: Vec<TeamMember> =
            JsonlReader::for_entity(&self.config, EntityType::TeamMember).read_all()?;
        Ok(dedup_by_id(team, |m| m.id.as_str()))
    }

    fn posts(&self) -> Result<Vec<Post>, StorageError> {
        let posts: Vec<Post> = JsonlReader::for_entity(&self.config, EntityType::Post).read_all()?;
        Ok(dedup_by_id(posts, |p| p.id.as_str()))
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Campaign).read_all()
    }
}

/// Repository over an in-memory dataset.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    dataset: Dataset,
}

impl InMemoryRepository {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl MetricsRepository for InMemoryRepository {
    fn records(&self) -> Result<Vec<MetricRecord>, StorageError> {
        Ok(self.dataset.records.clone())
    }

    fn team(&self) -> Result<Vec<TeamMember>, StorageError> {
        Ok(self.dataset.team.clone())
    }

    fn posts(&self) -> Result<Vec<Post>, StorageError> {
        Ok(self.dataset.posts.clone())
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, StorageError> {
        Ok(self.dataset.campaigns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricKind, MetricTotals, PlatformId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(platform: PlatformId, account: &str, reach: u64) -> MetricRecord {
        MetricRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            platform,
            account.to_string(),
            MetricTotals::default().with(MetricKind::Reach, reach),
        )
    }

    #[test]
    fn test_jsonl_repository_add_record_upserts() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonlRepository::new(StorageConfig::new(temp_dir.path().to_path_buf()));

        assert!(!repo
            .add_record(&record(PlatformId::Twitter, "@company", 100))
            .unwrap());
        assert!(!repo
            .add_record(&record(PlatformId::Reddit, "u/company_official", 5))
            .unwrap());
        assert!(repo
            .add_record(&record(PlatformId::Twitter, "@company", 450))
            .unwrap());

        let records = repo.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].totals.reach, 450);
        assert_eq!(records[1].platform, PlatformId::Reddit);
    }

    #[test]
    fn test_jsonl_repository_seed_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonlRepository::new(StorageConfig::new(temp_dir.path().join("data")));

        let dataset = Dataset {
            records: vec![record(PlatformId::YouTube, "Company Channel", 89000)],
            team: vec![TeamMember::new(
                "Sarah Johnson".to_string(),
                "Social Media Manager".to_string(),
                12,
            )],
            ..Dataset::default()
        };
        repo.seed(&dataset).unwrap();

        assert_eq!(repo.records().unwrap(), dataset.records);
        assert_eq!(repo.team().unwrap(), dataset.team);
        assert!(repo.posts().unwrap().is_empty());
        assert!(repo.campaigns().unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_repository_skips_invalid_records() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        let repo = JsonlRepository::new(config.clone());

        let valid = record(PlatformId::Twitter, "@company", 100);
        let mut blank_account = record(PlatformId::Medium, "@company-blog", 5);
        blank_account.account = String::new();
        let mut edited = record(PlatformId::Reddit, "u/company_official", 7);
        edited.account = "u/someone_else".to_string();

        JsonlWriter::<MetricRecord>::for_entity(&config, EntityType::Record)
            .write_all(&[valid.clone(), blank_account, edited])
            .unwrap();

        assert_eq!(repo.records().unwrap(), vec![valid]);
    }

    #[test]
    fn test_empty_data_dir_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonlRepository::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        assert!(repo.records().unwrap().is_empty());
        assert!(repo.query(&FilterCriteria::default()).unwrap().is_empty());
    }

    #[test]
    fn test_query_filters_and_flattens() {
        let repo = InMemoryRepository::new(Dataset {
            records: vec![
                record(PlatformId::Twitter, "@company", 45000),
                record(PlatformId::LinkedIn, "Company Page", 23000),
            ],
            ..Dataset::default()
        });

        let criteria = FilterCriteria::default().with_platforms([PlatformId::LinkedIn]);
        let points = repo.query(&criteria).unwrap();
        assert_eq!(points.len(), MetricKind::ALL.len());
        assert!(points.iter().all(|p| p.platform == PlatformId::LinkedIn));
        assert_eq!(points[0].value, 23000.0);
    }
}
