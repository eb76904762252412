//! Per-platform detail: top posts and campaigns.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::calculate::{format_date, format_metric, format_thousands, rank};
use crate::models::{Campaign, CampaignStatus, MetricKind, PlatformId, Post};

/// Post ordering in the drilldown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Likes + comments + shares
    #[default]
    Engagement,
    Reach,
    /// Most recent first
    Date,
}

impl PostSort {
    fn score(&self, post: &Post) -> f64 {
        match self {
            PostSort::Engagement => post.engagement() as f64,
            PostSort::Reach => post.reach as f64,
            PostSort::Date => f64::from(post.date.num_days_from_ce()),
        }
    }
}

impl FromStr for PostSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engagement" => Ok(PostSort::Engagement),
            "reach" => Ok(PostSort::Reach),
            "date" => Ok(PostSort::Date),
            other => Err(format!("unknown post sort: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    pub rank: usize,
    pub text: String,
    pub author: String,
    pub date: String,
    pub likes: String,
    pub comments: String,
    pub shares: String,
    pub reach: String,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub name: String,
    pub posts: u32,
    pub reach: String,
    /// e.g. `8.5%`
    pub engagement_rate: String,
    pub status: CampaignStatus,
}

/// Detail view for one platform and metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrilldownView {
    pub platform: PlatformId,
    pub metric: MetricKind,
    /// e.g. `Twitter - Engagement Details`
    pub title: String,
    pub sort: PostSort,
    pub posts: Vec<PostRow>,
    pub campaigns: Vec<CampaignRow>,
}

impl DrilldownView {
    pub fn build(
        platform: PlatformId,
        metric: MetricKind,
        sort: PostSort,
        posts: &[Post],
        campaigns: &[Campaign],
    ) -> Self {
        let platform_posts = posts.iter().filter(|p| p.platform == platform);

        let posts = rank(platform_posts, |post| sort.score(post))
            .into_iter()
            .map(|ranked| {
                let post = ranked.entity;
                PostRow {
                    rank: ranked.rank,
                    text: post.text.clone(),
                    author: post.author.clone(),
                    date: format_date(post.date),
                    likes: format_thousands(count(post.likes)),
                    comments: format_thousands(count(post.comments)),
                    shares: format_thousands(count(post.shares)),
                    reach: format_thousands(count(post.reach)),
                    engagement: post.engagement(),
                }
            })
            .collect();

        let campaigns = campaigns
            .iter()
            .filter(|c| c.platform == platform)
            .map(|c| CampaignRow {
                name: c.name.clone(),
                posts: c.posts,
                reach: format_metric(c.total_reach as f64),
                engagement_rate: format!("{:.1}%", c.engagement_rate),
                status: c.status,
            })
            .collect();

        Self {
            platform,
            metric,
            title: format!("{} - {} Details", platform.label(), metric.label()),
            sort,
            posts,
            campaigns,
        }
    }
}

fn count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn authors(view: &DrilldownView) -> Vec<&str> {
        view.posts.iter().map(|p| p.author.as_str()).collect()
    }

    #[test]
    fn test_drilldown_sorted_by_engagement() {
        let view = DrilldownView::build(
            PlatformId::Twitter,
            MetricKind::Engagement,
            PostSort::Engagement,
            &sample::posts(),
            &sample::campaigns(),
        );

        assert_eq!(view.title, "Twitter - Engagement Details");
        assert_eq!(authors(&view), vec!["Sarah Johnson", "Mike Chen", "Emma Davis"]);
        assert_eq!(view.posts[0].engagement, 1479);
        assert_eq!(view.posts[0].likes, "1,234");
        assert_eq!(view.posts[0].reach, "12,500");
        assert_eq!(view.posts[0].rank, 1);

        assert_eq!(view.campaigns.len(), 3);
        assert_eq!(view.campaigns[0].reach, "45.6K");
        assert_eq!(view.campaigns[0].engagement_rate, "8.5%");
    }

    #[test]
    fn test_drilldown_sorted_by_date_newest_first() {
        let mut posts = sample::posts();
        posts.push(
            Post::new(
                PlatformId::Twitter,
                "Fresh".to_string(),
                NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
                "Lisa Wang".to_string(),
            )
            .with_counts(1, 0, 0, 10),
        );

        let view = DrilldownView::build(
            PlatformId::Twitter,
            MetricKind::Reach,
            PostSort::Date,
            &posts,
            &[],
        );
        assert_eq!(
            authors(&view),
            vec!["Lisa Wang", "Sarah Johnson", "Mike Chen", "Emma Davis"]
        );
        assert!(view.campaigns.is_empty());

        let view = DrilldownView::build(
            PlatformId::Twitter,
            MetricKind::Reach,
            PostSort::Reach,
            &posts,
            &[],
        );
        assert_eq!(authors(&view)[3], "Lisa Wang");
    }

    #[test]
    fn test_drilldown_other_platform_is_empty() {
        let view = DrilldownView::build(
            PlatformId::Reddit,
            MetricKind::Views,
            PostSort::default(),
            &sample::posts(),
            &sample::campaigns(),
        );
        assert!(view.posts.is_empty());
        assert!(view.campaigns.is_empty());
    }

    #[test]
    fn test_post_sort_parse() {
        assert_eq!("Reach".parse::<PostSort>(), Ok(PostSort::Reach));
        assert!("likes".parse::<PostSort>().is_err());
    }
}
