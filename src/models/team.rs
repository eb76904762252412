//! Team members shown on the leaderboard.

use serde::{Deserialize, Serialize};

use super::{EntityId, MemberId, MetricKind, MetricTotals};

/// A team member and the totals of the accounts they manage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier (derived from name)
    pub id: MemberId,

    pub name: String,

    /// Job title (e.g., "Social Media Manager")
    pub role: String,

    pub accounts_managed: u32,

    /// Totals for the current period
    pub current: MetricTotals,

    /// Totals for the previous period, used for the performance badge
    #[serde(default)]
    pub previous: MetricTotals,
}

impl TeamMember {
    /// Create a new TeamMember with auto-generated ID.
    pub fn new(name: String, role: String, accounts_managed: u32) -> Self {
        let id = EntityId::generate(&["member", &name]);
        Self {
            id,
            name,
            role,
            accounts_managed,
            current: MetricTotals::default(),
            previous: MetricTotals::default(),
        }
    }

    /// Builder method to set current and previous totals.
    pub fn with_totals(mut self, current: MetricTotals, previous: MetricTotals) -> Self {
        self.current = current;
        self.previous = previous;
        self
    }

    /// Current value of the given metric.
    pub fn metric(&self, metric: MetricKind) -> u64 {
        self.current.get(metric)
    }

    /// Avatar fallback: first letter of each name part.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_initials() {
        let member = TeamMember::new(
            "Emily Rodriguez".to_string(),
            "Marketing Specialist".to_string(),
            6,
        );
        assert_eq!(member.initials(), "ER");
    }

    #[test]
    fn test_member_initials_single_name() {
        let member = TeamMember::new("Cher".to_string(), "Creator".to_string(), 1);
        assert_eq!(member.initials(), "C");
    }

    #[test]
    fn test_member_metric() {
        let member = TeamMember::new("Mike Chen".to_string(), "Content Creator".to_string(), 8)
            .with_totals(
                MetricTotals::default().with(MetricKind::Reach, 620_000),
                MetricTotals::default(),
            );
        assert_eq!(member.metric(MetricKind::Reach), 620_000);
        assert_eq!(member.metric(MetricKind::Views), 0);
    }

    #[test]
    fn test_member_id_deterministic() {
        let a = TeamMember::new("Lisa Wang".to_string(), "Community Manager".to_string(), 5);
        let b = TeamMember::new("Lisa Wang".to_string(), "Other".to_string(), 2);
        assert_eq!(a.id, b.id);
    }
}
