//! Consecutive-active-day streak calculation.
//!
//! An owner's streak is the longest unbroken run of days with at least
//! one event, ending today. The walk is bounded by the lookback horizon
//! ([`crate::config::StreakConfig::horizon_days`]); a streak that long or
//! longer reports the horizon value.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Length of the unbroken run of active days ending at `today`.
///
/// Walks backward one day at a time and stops at the first day missing
/// from `active_days` or after `horizon_days` steps.
pub fn streak_length(active_days: &BTreeSet<NaiveDate>, today: NaiveDate, horizon_days: u32) -> u32 {
    let mut length = 0;
    let mut day = today;
    while length < horizon_days && active_days.contains(&day) {
        length += 1;
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_consecutive_days_with_gap_before() {
        let active: BTreeSet<_> = [date(2024, 5, 10), date(2024, 5, 9), date(2024, 5, 8)]
            .into_iter()
            .collect();
        // 2024-05-07 is absent, so the run stops at three.
        assert_eq!(streak_length(&active, date(2024, 5, 10), 60), 3);
    }

    #[test]
    fn inactive_today_means_zero() {
        let active: BTreeSet<_> = [date(2024, 5, 9), date(2024, 5, 8)].into_iter().collect();
        assert_eq!(streak_length(&active, date(2024, 5, 10), 60), 0);
    }

    #[test]
    fn gap_in_the_middle_stops_the_walk() {
        let active: BTreeSet<_> = [
            date(2024, 5, 10),
            date(2024, 5, 9),
            // 2024-05-08 missing
            date(2024, 5, 7),
            date(2024, 5, 6),
        ]
        .into_iter()
        .collect();
        assert_eq!(streak_length(&active, date(2024, 5, 10), 60), 2);
    }

    #[test]
    fn streak_is_capped_at_horizon() {
        let today = date(2024, 5, 31);
        let mut active = BTreeSet::new();
        let mut day = today;
        for _ in 0..40 {
            active.insert(day);
            day = day.pred_opt().unwrap();
        }
        assert_eq!(streak_length(&active, today, 7), 7);
        assert_eq!(streak_length(&active, today, 60), 40);
    }

    #[test]
    fn month_boundary_is_still_consecutive() {
        let active: BTreeSet<_> = [date(2024, 3, 1), date(2024, 2, 29), date(2024, 2, 28)]
            .into_iter()
            .collect();
        // Leap-year February flows into March without a break.
        assert_eq!(streak_length(&active, date(2024, 3, 1), 60), 3);
    }
}
