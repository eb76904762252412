//! Content-addressed identifiers.
//!
//! Records, team members, posts and alerts are keyed by a short SHA256 digest of
//! the fields that make them unique, so the same row entered twice maps to the
//! same id and upserts instead of duplicating.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters kept from the digest.
const ID_LEN: usize = 16;

/// Keeps `("ab", "c")` and `("a", "bc")` apart.
const FIELD_SEPARATOR: u8 = b'|';

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Digest the identifying fields of an entity, in order.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        let mut parts = fields.iter();
        if let Some(first) = parts.next() {
            hasher.update(first.as_bytes());
        }
        for field in parts {
            hasher.update([FIELD_SEPARATOR]);
            hasher.update(field.as_bytes());
        }

        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(ID_LEN);
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metric rows: platform + account + date
pub type RecordId = EntityId;

/// Team members: name
pub type MemberId = EntityId;

/// Drilldown posts: platform + date + author + text
pub type PostId = EntityId;

/// Alerts: kind + title + message
pub type AlertId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_fields_same_id() {
        let id1 = EntityId::generate(&["twitter", "@company", "2024-01-15"]);
        let id2 = EntityId::generate(&["twitter", "@company", "2024-01-15"]);
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_different_date_different_id() {
        let id1 = EntityId::generate(&["twitter", "@company", "2024-01-15"]);
        let id2 = EntityId::generate(&["twitter", "@company", "2024-01-14"]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_field_boundaries_matter() {
        let id1 = EntityId::generate(&["ab", "c"]);
        let id2 = EntityId::generate(&["a", "bc"]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_is_short_hex() {
        let id = EntityId::generate(&["instagram", "@company_insta"]);
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = EntityId::generate(&["member", "Sarah Johnson"]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
