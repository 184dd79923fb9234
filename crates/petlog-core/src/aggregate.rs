//! Event aggregation over an owner/pet/window filter.
//!
//! Every call site that needs a summary goes through [`summarize`], so a
//! combined list-plus-summary response and a standalone summary computed
//! over the same filter always report identical numbers.

use std::collections::BTreeMap;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{Event, EventCategory};
use crate::period::{day_key, TimeWindow};

/// Conjunctive event filter: owner equality is required, pet equality and
/// the end-time window are optional. Interpreted identically by the store
/// and by [`EventFilter::matches`], regardless of call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub owner_id: String,
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub window: Option<TimeWindow>,
}

impl EventFilter {
    pub fn owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            pet_id: None,
            window: None,
        }
    }

    pub fn with_pet(mut self, pet_id: impl Into<String>) -> Self {
        self.pet_id = Some(pet_id.into());
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Whether an event satisfies every present predicate. The window
    /// matches on the event's end time.
    pub fn matches(&self, event: &Event) -> bool {
        if event.owner_id != self.owner_id {
            return false;
        }
        if let Some(pet_id) = &self.pet_id {
            if event.pet_id.as_deref() != Some(pet_id.as_str()) {
                return false;
            }
        }
        if let Some(window) = &self.window {
            if !window.contains(event.end_ms) {
                return false;
            }
        }
        true
    }
}

/// Aggregate of the duration field over a set of matching events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub count: i64,
    pub sum_secs: i64,
    pub max_secs: i64,
    /// Floor of `sum / count`; zero when there are no events.
    pub average_secs: i64,
}

/// Compute count/sum/max/average over the given events.
///
/// The average uses integer floor division and is defined as zero for an
/// empty input rather than an error.
pub fn summarize(events: &[Event]) -> Summary {
    let count = events.len() as i64;
    if count == 0 {
        return Summary::default();
    }
    let sum_secs: i64 = events.iter().map(|e| e.duration_secs).sum();
    let max_secs = events.iter().map(|e| e.duration_secs).max().unwrap_or(0);
    Summary {
        count,
        sum_secs,
        max_secs,
        average_secs: sum_secs.div_euclid(count),
    }
}

/// Per-day category counts, for calendar-style breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCategoryCounts {
    pub day: String,
    pub normal: i64,
    pub abnormal: i64,
    pub total: i64,
}

/// Group events into day buckets (in `tz`) with per-category counts,
/// ordered by day ascending.
pub fn category_breakdown(events: &[Event], tz: &FixedOffset) -> Result<Vec<DayCategoryCounts>> {
    let mut days: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for event in events {
        let key = day_key(event.end_ms, tz)?;
        let counts = days.entry(key).or_default();
        match event.category {
            EventCategory::Normal => counts.0 += 1,
            EventCategory::Abnormal => counts.1 += 1,
        }
    }
    Ok(days
        .into_iter()
        .map(|(day, (normal, abnormal))| DayCategoryCounts {
            day,
            normal,
            abnormal,
            total: normal + abnormal,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn event(owner: &str, pet: Option<&str>, end_ms: i64, duration_secs: i64) -> Event {
        let draft = EventDraft {
            pet_id: pet.map(str::to_string),
            end_ms: Some(end_ms),
            duration_secs: Some(duration_secs),
            ..Default::default()
        };
        Event::from_draft(owner, draft, end_ms).unwrap()
    }

    #[test]
    fn empty_input_yields_all_zeros() {
        let summary = summarize(&[]);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.average_secs, 0);
        assert_eq!(summary.max_secs, 0);
    }

    #[test]
    fn average_is_floored_integer_division() {
        let events = vec![
            event("u1", None, 1_000, 2),
            event("u1", None, 2_000, 3),
            event("u1", None, 3_000, 5),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum_secs, 10);
        assert_eq!(summary.max_secs, 5);
        // 10 / 3 floors to 3, never rounds to 4.
        assert_eq!(summary.average_secs, 3);
    }

    #[test]
    fn filter_is_conjunctive() {
        let window = TimeWindow::new(1_000, 2_000);
        let filter = EventFilter::owner("u1").with_pet("p1").with_window(window);

        let matching = event("u1", Some("p1"), 1_500, 60);
        assert!(filter.matches(&matching));

        assert!(!filter.matches(&event("u2", Some("p1"), 1_500, 60)));
        assert!(!filter.matches(&event("u1", Some("p2"), 1_500, 60)));
        assert!(!filter.matches(&event("u1", None, 1_500, 60)));
        // End bound is exclusive.
        assert!(!filter.matches(&event("u1", Some("p1"), 2_000, 60)));
    }

    #[test]
    fn owner_only_filter_ignores_pet_and_window() {
        let filter = EventFilter::owner("u1");
        assert!(filter.matches(&event("u1", Some("p1"), 5, 60)));
        assert!(filter.matches(&event("u1", None, i64::MAX, 60)));
    }

    #[test]
    fn breakdown_groups_by_day_and_category() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let day1 = 1_714_521_600_000; // 2024-05-01 00:00:00 UTC
        let mut events = vec![
            event("u1", None, day1 + 3_600_000, 60),
            event("u1", None, day1 + 7_200_000, 60),
            event("u1", None, day1 + 90_000_000, 60), // next day
        ];
        events[1].category = EventCategory::Abnormal;

        let breakdown = category_breakdown(&events, &tz).unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].day, "2024-05-01");
        assert_eq!(breakdown[0].normal, 1);
        assert_eq!(breakdown[0].abnormal, 1);
        assert_eq!(breakdown[0].total, 2);
        assert_eq!(breakdown[1].day, "2024-05-02");
        assert_eq!(breakdown[1].total, 1);
    }
}
