//! Fixture data shown by the dashboard
//!
//! Seed audiences, the customer-list catalogue, and the static performance
//! and comparison series used by reports.

use shared::{Audience, AudienceId, AudienceSource, AudienceStatus};

use crate::types::{ComparisonMetric, ComparisonPoint, CustomerList, PerformancePoint, Trend};

/// Fixed rates shown next to every audience in reports and performance exports
pub const MATCH_RATE: &str = "87.3%";
pub const ENGAGEMENT_RATE: &str = "6.8%";
pub const CONVERSION_RATE: &str = "3.4%";

fn seed(id: u64, name: &str, size: &str, created: &str, status: AudienceStatus, reach: u64) -> Audience {
    Audience {
        id: AudienceId(id),
        name: name.to_string(),
        source: AudienceSource::CustomerList,
        size: size.to_string(),
        created: created.to_string(),
        status,
        reach,
    }
}

/// Audiences the store starts with when seeding is enabled
pub fn seed_audiences() -> Vec<Audience> {
    vec![
        seed(1, "test", "5%", "Jun 16, 2025", AudienceStatus::Active, 2_500_000),
        seed(2, "This is test", "5%", "Jun 16, 2025", AudienceStatus::Active, 1_800_000),
        seed(3, "Loyal Customers Lookalike", "7%", "May 25, 2025", AudienceStatus::Active, 3_200_000),
        seed(4, "High Value Customers Lookalike", "5%", "May 20, 2025", AudienceStatus::Processing, 0),
        seed(5, "New Customer Lookalike", "3%", "May 15, 2025", AudienceStatus::Processing, 0),
    ]
}

/// Seed lists a lookalike audience can be built from
pub const CUSTOMER_LISTS: [CustomerList; 4] = [
    CustomerList { id: "list-1", name: "High Value Customers", users: "2.5M users" },
    CustomerList { id: "list-2", name: "Recent Purchasers", users: "1.8M users" },
    CustomerList { id: "list-3", name: "Loyal Customers", users: "3.2M users" },
    CustomerList { id: "list-4", name: "Premium Subscribers", users: "950K users" },
];

pub fn find_customer_list(id: &str) -> Option<&'static CustomerList> {
    CUSTOMER_LISTS.iter().find(|list| list.id == id)
}

fn point(date: &str, reach: u64, engagement: u64, conversions: u64) -> PerformancePoint {
    PerformancePoint {
        date: date.to_string(),
        reach,
        engagement,
        conversions,
    }
}

/// Weekly timeline printed in single-audience reports
pub fn performance_timeline() -> Vec<PerformancePoint> {
    vec![
        point("Jan 1", 1_200_000, 85_000, 2_400),
        point("Jan 8", 1_350_000, 92_000, 2_800),
        point("Jan 15", 1_500_000, 105_000, 3_200),
        point("Jan 22", 1_680_000, 118_000, 3_600),
        point("Jan 29", 1_850_000, 125_000, 4_100),
        point("Feb 5", 2_100_000, 142_000, 4_800),
    ]
}

fn metric(name: &str, first: f64, second: f64, difference: f64, trend: Trend) -> ComparisonMetric {
    ComparisonMetric {
        metric: name.to_string(),
        first,
        second,
        difference,
        trend,
    }
}

/// Metrics shown when two audiences are compared.
///
/// These are placeholders and are not derived from the selected audiences.
pub fn comparison_metrics() -> Vec<ComparisonMetric> {
    vec![
        metric("Total Reach", 2_100_000.0, 1_850_000.0, 13.5, Trend::Up),
        metric("Match Rate", 87.3, 82.1, 6.3, Trend::Up),
        metric("Engagement Rate", 6.8, 7.2, -5.6, Trend::Down),
        metric("Conversion Rate", 3.4, 2.9, 17.2, Trend::Up),
    ]
}

/// Weekly performance scores of the two compared audiences
pub fn comparison_timeline() -> Vec<ComparisonPoint> {
    [("Week 1", 85, 78), ("Week 2", 88, 82), ("Week 3", 91, 79), ("Week 4", 87, 84)]
        .into_iter()
        .map(|(date, first, second)| ComparisonPoint {
            date: date.to_string(),
            first,
            second,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let audiences = seed_audiences();
        let ids: HashSet<_> = audiences.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), audiences.len());
    }

    #[test]
    fn test_seed_reach_only_on_active() {
        for audience in seed_audiences() {
            if audience.status != AudienceStatus::Active {
                assert_eq!(audience.reach, 0, "{} should have no reach yet", audience.name);
            }
        }
    }

    #[test]
    fn test_customer_list_lookup() {
        assert_eq!(find_customer_list("list-3").map(|l| l.name), Some("Loyal Customers"));
        assert!(find_customer_list("list-9").is_none());
    }
}
