//! Built-in demo dataset.
//!
//! Lets the dashboard render something meaningful before any data has been
//! entered. `pulse seed` writes it to the data directory.

use chrono::NaiveDate;

use crate::models::{
    Campaign, CampaignStatus, MetricKind, MetricRecord, MetricTotals, PlatformId, Post, TeamMember,
};
use crate::storage::Dataset;

/// Table rows, team, posts and campaigns.
pub fn dataset() -> Dataset {
    Dataset {
        records: records(),
        team: team(),
        posts: posts(),
        campaigns: campaigns(),
    }
}

/// [`dataset`] plus monthly views per platform for the first half of 2024.
pub fn dataset_with_history() -> Dataset {
    let mut data = dataset();
    data.records.extend(monthly_history());
    data
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn record(
    date: NaiveDate,
    platform: PlatformId,
    account: &str,
    reach: u64,
    views: u64,
    engagement: u64,
    clicks: u64,
    leads: u64,
    conversions: u64,
) -> MetricRecord {
    MetricRecord::new(
        date,
        platform,
        account.to_string(),
        MetricTotals {
            reach,
            views,
            engagement,
            clicks,
            leads,
            conversions,
        },
    )
}

pub fn records() -> Vec<MetricRecord> {
    vec![
        record(day(2024, 1, 15), PlatformId::Twitter, "@company", 45000, 23000, 1200, 450, 12, 3),
        record(day(2024, 1, 15), PlatformId::Instagram, "@company_insta", 67000, 45000, 2100, 780, 24, 8),
        record(day(2024, 1, 14), PlatformId::LinkedIn, "Company Page", 23000, 12000, 890, 340, 18, 5),
        record(day(2024, 1, 14), PlatformId::YouTube, "Company Channel", 89000, 67000, 3400, 1200, 45, 12),
        record(day(2024, 1, 13), PlatformId::Medium, "@company-blog", 12000, 8900, 450, 230, 8, 2),
    ]
}

/// Monthly views rollups, one record per platform per month.
pub fn monthly_history() -> Vec<MetricRecord> {
    const VIEWS: [(u32, [u64; 7]); 6] = [
        (1, [4000, 2400, 2400, 1800, 800, 600, 1200]),
        (2, [3000, 1398, 2210, 2000, 900, 700, 1400]),
        (3, [2000, 9800, 2290, 2500, 1100, 800, 1600]),
        (4, [2780, 3908, 2000, 2200, 1200, 900, 1800]),
        (5, [1890, 4800, 2181, 2400, 1000, 750, 1500]),
        (6, [2390, 3800, 2500, 2600, 1300, 850, 1700]),
    ];

    VIEWS
        .iter()
        .flat_map(|(month, values)| {
            PlatformId::ALL
                .iter()
                .zip(values.iter())
                .map(move |(platform, views)| {
                    MetricRecord::new(
                        day(2024, *month, 1),
                        *platform,
                        "All accounts".to_string(),
                        MetricTotals::default().with(MetricKind::Views, *views),
                    )
                })
        })
        .collect()
}

/// Previous-period totals that make `current` show `change` percent growth.
fn previous_for(current: MetricTotals, change: f64) -> MetricTotals {
    let mut previous = MetricTotals::default();
    for metric in MetricKind::ALL {
        let value = (current.get(metric) as f64 / (1.0 + change / 100.0)).round() as u64;
        previous = previous.with(metric, value);
    }
    previous
}

fn member(
    name: &str,
    role: &str,
    accounts: u32,
    totals: [u64; 4],
    change: f64,
) -> TeamMember {
    let [reach, views, engagement, conversions] = totals;
    let current = MetricTotals {
        reach,
        views,
        engagement,
        conversions,
        ..MetricTotals::default()
    };
    TeamMember::new(name.to_string(), role.to_string(), accounts)
        .with_totals(current, previous_for(current, change))
}

pub fn team() -> Vec<TeamMember> {
    vec![
        member("Sarah Johnson", "Social Media Manager", 12, [850000, 420000, 89000, 2400], 25.4),
        member("Mike Chen", "Content Creator", 8, [620000, 380000, 67000, 1800], 18.2),
        member("Emily Rodriguez", "Marketing Specialist", 6, [450000, 290000, 45000, 1200], 12.7),
        member("David Kim", "Digital Strategist", 4, [320000, 180000, 32000, 950], -5.1),
        member("Lisa Wang", "Community Manager", 5, [280000, 160000, 28000, 720], 8.9),
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post::new(
            PlatformId::Twitter,
            "Exciting news! Our latest product launch exceeded all expectations...".to_string(),
            day(2024, 1, 15),
            "Sarah Johnson".to_string(),
        )
        .with_counts(1234, 89, 156, 12500),
        Post::new(
            PlatformId::Twitter,
            "Behind the scenes: Here's how our team built this amazing feature...".to_string(),
            day(2024, 1, 12),
            "Mike Chen".to_string(),
        )
        .with_counts(892, 67, 134, 9800),
        Post::new(
            PlatformId::Twitter,
            "Customer spotlight: Amazing success story from our users!".to_string(),
            day(2024, 1, 10),
            "Emma Davis".to_string(),
        )
        .with_counts(756, 45, 89, 8900),
    ]
}

pub fn campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            name: "Q1 Product Launch".to_string(),
            platform: PlatformId::Twitter,
            posts: 12,
            total_reach: 45600,
            engagement_rate: 8.5,
            status: CampaignStatus::Active,
        },
        Campaign {
            name: "Holiday Special".to_string(),
            platform: PlatformId::Twitter,
            posts: 8,
            total_reach: 32100,
            engagement_rate: 7.2,
            status: CampaignStatus::Completed,
        },
        Campaign {
            name: "Brand Awareness".to_string(),
            platform: PlatformId::Twitter,
            posts: 15,
            total_reach: 67800,
            engagement_rate: 9.1,
            status: CampaignStatus::Active,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::{change_percent, format_change};

    #[test]
    fn test_dataset_shape() {
        let data = dataset();
        assert_eq!(data.records.len(), 5);
        assert_eq!(data.team.len(), 5);
        assert_eq!(data.posts.len(), 3);
        assert_eq!(data.campaigns.len(), 3);
    }

    #[test]
    fn test_history_covers_every_platform_monthly() {
        let history = monthly_history();
        assert_eq!(history.len(), 6 * PlatformId::ALL.len());
        assert!(history.iter().all(|r| r.totals.reach == 0));
        assert_eq!(dataset_with_history().records.len(), 5 + history.len());
    }

    #[test]
    fn test_team_previous_totals_reproduce_badges() {
        let team = team();
        let badges: Vec<String> = team
            .iter()
            .map(|m| {
                format_change(change_percent(
                    m.current.reach as f64,
                    m.previous.reach as f64,
                ))
            })
            .collect();
        assert_eq!(badges, vec!["+25.4%", "+18.2%", "+12.7%", "-5.1%", "+8.9%"]);
    }

    #[test]
    fn test_record_ids_unique() {
        let data = dataset_with_history();
        let mut ids: Vec<_> = data.records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), data.records.len());
    }
}
