//! Derived statistics over the audience store

use shared::{Audience, AudienceStats, AudienceStatus};

/// Aggregate reach and status counts for a snapshot of audiences
pub fn compute_stats(audiences: &[Audience]) -> AudienceStats {
    audiences.iter().fold(AudienceStats::default(), |mut stats, audience| {
        stats.total += 1;
        // User edits may set any reach; clamp instead of overflowing
        stats.total_reach = stats.total_reach.saturating_add(audience.reach);
        match audience.status {
            AudienceStatus::Processing => stats.processing += 1,
            AudienceStatus::Active => stats.active += 1,
            AudienceStatus::Error => stats.error += 1,
        }
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::seed_audiences;
    use shared::AudienceId;

    #[test]
    fn test_empty_store_stats() {
        assert_eq!(compute_stats(&[]), AudienceStats::default());
    }

    #[test]
    fn test_seed_stats() {
        let stats = compute_stats(&seed_audiences());

        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.processing, 2);
        assert_eq!(stats.error, 0);
        assert_eq!(stats.total_reach, 2_500_000 + 1_800_000 + 3_200_000);
    }

    #[test]
    fn test_total_reach_saturates() {
        let mut audiences = seed_audiences();
        audiences.iter_mut().find(|a| a.id == AudienceId(1)).unwrap().reach = u64::MAX;

        let stats = compute_stats(&audiences);
        assert_eq!(stats.total_reach, u64::MAX);
        assert_eq!(stats.total, 5);
    }
}
