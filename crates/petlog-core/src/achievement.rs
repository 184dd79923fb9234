//! Streak-based achievement badges.

use serde::{Deserialize, Serialize};

/// A badge unlocked by keeping a streak going for `threshold_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub threshold_days: u32,
}

impl Badge {
    fn for_threshold(threshold_days: u32) -> Self {
        Self {
            id: format!("streak_{threshold_days}d"),
            threshold_days,
        }
    }
}

/// Badges whose threshold the current streak meets, ascending by
/// threshold. Thresholds must not exceed the streak horizon or the badge
/// becomes unreachable; [`crate::config::EngineConfig::validate`]
/// enforces that.
pub fn unlocked_badges(streak_days: u32, thresholds: &[u32]) -> Vec<Badge> {
    let mut unlocked: Vec<u32> = thresholds
        .iter()
        .copied()
        .filter(|t| *t > 0 && *t <= streak_days)
        .collect();
    unlocked.sort_unstable();
    unlocked.dedup();
    unlocked.into_iter().map(Badge::for_threshold).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_every_threshold_at_or_below_streak() {
        let badges = unlocked_badges(7, &[3, 7, 30]);
        assert_eq!(
            badges.iter().map(|b| b.threshold_days).collect::<Vec<_>>(),
            vec![3, 7]
        );
        assert_eq!(badges[0].id, "streak_3d");
    }

    #[test]
    fn zero_streak_unlocks_nothing() {
        assert!(unlocked_badges(0, &[3, 7, 30]).is_empty());
    }

    #[test]
    fn thresholds_are_sorted_and_deduped() {
        let badges = unlocked_badges(30, &[30, 3, 7, 3]);
        assert_eq!(
            badges.iter().map(|b| b.threshold_days).collect::<Vec<_>>(),
            vec![3, 7, 30]
        );
    }
}
