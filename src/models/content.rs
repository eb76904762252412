//! Posts and campaigns shown in the platform drilldown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityId, PlatformId, PostId};

/// A published post and its interaction counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub platform: PlatformId,
    pub text: String,
    pub date: NaiveDate,
    pub author: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub reach: u64,
}

impl Post {
    /// Create a new Post with auto-generated ID and zero counts.
    pub fn new(platform: PlatformId, text: String, date: NaiveDate, author: String) -> Self {
        let id = EntityId::generate(&[platform.id(), &date.to_string(), &author, &text]);
        Self {
            id,
            platform,
            text,
            date,
            author,
            likes: 0,
            comments: 0,
            shares: 0,
            reach: 0,
        }
    }

    /// Builder method to set interaction counts.
    pub fn with_counts(mut self, likes: u64, comments: u64, shares: u64, reach: u64) -> Self {
        self.likes = likes;
        self.comments = comments;
        self.shares = shares;
        self.reach = reach;
        self
    }

    /// Likes + comments + shares.
    pub fn engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }
}

/// Campaign lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Completed,
}

/// A group of posts run together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub platform: PlatformId,
    pub posts: u32,
    pub total_reach: u64,
    /// Engagement rate in percent
    pub engagement_rate: f64,
    pub status: CampaignStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_engagement() {
        let post = Post::new(
            PlatformId::Twitter,
            "Launch day".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "Sarah Johnson".to_string(),
        )
        .with_counts(1234, 89, 156, 12500);

        assert_eq!(post.engagement(), 1479);
        assert_eq!(post.reach, 12500);
    }

    #[test]
    fn test_post_engagement_saturates() {
        let post = Post::new(
            PlatformId::Twitter,
            "Viral".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "Mike Chen".to_string(),
        )
        .with_counts(u64::MAX, 1, 1, 0);

        assert_eq!(post.engagement(), u64::MAX);
    }

    #[test]
    fn test_campaign_status_serialization() {
        let json = serde_json::to_string(&CampaignStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
