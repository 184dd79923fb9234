//! Engine facade over an injected storage capability.
//!
//! Stateless per call and safe to share across request-handling threads;
//! all serialization happens in the store. Statistics reads fail soft: a
//! store failure degrades to a zero-valued result with a warning, while
//! the write path (event insert + rollup increment) always propagates
//! errors, since silently dropping an increment would corrupt ranking.

use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::achievement::{unlocked_badges, Badge};
use crate::aggregate::{summarize, EventFilter, Summary};
use crate::config::EngineConfig;
use crate::error::{CoreError, Result};
use crate::event::{Event, EventCategory, EventDraft};
use crate::period::{self, PeriodKind, TimeWindow, DAY_KEY_FORMAT};
use crate::reminder::{evaluate_pet, Reminder, RuleContext};
use crate::rollup::{Page, RankEntry};
use crate::store::{ConfigStore, EventStore, RollupStore};
use crate::streak::streak_length;

/// Combined list-plus-summary response over one filter.
///
/// `summary` covers every matching event; `items` is the requested page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total: i64,
    pub items: Vec<Event>,
    pub summary: Summary,
}

/// The aggregation and reminder engine.
pub struct Engine<S> {
    store: S,
    config: EngineConfig,
}

impl<S> Engine<S>
where
    S: EventStore + RollupStore + ConfigStore,
{
    /// Create an engine with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a period selector into a half-open window.
    pub fn resolve_window(
        &self,
        ref_ms: i64,
        kind: PeriodKind,
        tz: &FixedOffset,
    ) -> Result<TimeWindow> {
        period::resolve(ref_ms, kind, tz)
    }

    /// Insert an event and increment its owner's rollup counter for the
    /// event's local day, as one logical unit. Both failures propagate.
    pub fn record_and_rollup(
        &self,
        owner_id: &str,
        draft: EventDraft,
        tz: &FixedOffset,
        now_ms: i64,
    ) -> Result<Event> {
        require_owner(owner_id)?;
        let event = Event::from_draft(owner_id, draft, now_ms)?;
        self.store.insert_event(&event)?;
        let day = period::day_key(event.end_ms, tz)?;
        self.store.upsert_increment(owner_id, &day)?;
        log::debug!("recorded event {} for {owner_id}, rollup day {day}", event.id);
        Ok(event)
    }

    /// Summary over every event matching the filter. Fails soft on store
    /// errors.
    pub fn aggregate(&self, filter: &EventFilter) -> Result<Summary> {
        require_owner(&filter.owner_id)?;
        let result = self
            .store
            .query_events(filter)
            .map_err(CoreError::from)
            .map(|events| summarize(&events));
        soften("aggregate", result)
    }

    /// Paged event list plus summary over the same filter. The summary is
    /// computed by the same function as [`Engine::aggregate`], so both
    /// report identical numbers for identical filters.
    pub fn overview(&self, filter: &EventFilter, page: Page) -> Result<Overview> {
        require_owner(&filter.owner_id)?;
        let result = self
            .store
            .query_events(filter)
            .map_err(CoreError::from)
            .map(|events| {
                let summary = summarize(&events);
                let total = events.len() as i64;
                let start = (page.offset() as usize).min(events.len());
                let end = (start + page.size as usize).min(events.len());
                Overview {
                    total,
                    items: events[start..end].to_vec(),
                    summary,
                }
            });
        soften("overview", result)
    }

    /// Leaderboard over `day ∈ [start_day, end_day)`. Fails soft on store
    /// errors.
    pub fn rank(&self, start_day: &str, end_day: &str, page: Page) -> Result<Vec<RankEntry>> {
        let result = self
            .store
            .range_sum(start_day, end_day, page)
            .map_err(CoreError::from);
        soften("rank", result)
    }

    /// Current consecutive-active-day streak ending on the owner's local
    /// today. Fails soft on store errors.
    pub fn streak(&self, owner_id: &str, tz: &FixedOffset, now_ms: i64) -> Result<u32> {
        require_owner(owner_id)?;
        let horizon = self.config.streak.horizon_days;
        let today = period::local_date(now_ms, tz)?;
        let window = period::lookback_window(now_ms, horizon, tz)?;
        let result = self
            .store
            .distinct_days(owner_id, window, tz)
            .map_err(CoreError::from)
            .and_then(|days| {
                let active = parse_days(&days)?;
                Ok(streak_length(&active, today, horizon))
            });
        soften("streak", result)
    }

    /// Badges unlocked by the owner's current streak.
    pub fn badges(&self, owner_id: &str, tz: &FixedOffset, now_ms: i64) -> Result<Vec<Badge>> {
        let streak = self.streak(owner_id, tz, now_ms)?;
        Ok(unlocked_badges(streak, &self.config.streak.badge_thresholds))
    }

    /// Evaluate reminder rules for every pet of the owner. Pure with
    /// respect to stored state; recomputed from scratch each call. Fails
    /// soft on store errors.
    pub fn evaluate_reminders(
        &self,
        owner_id: &str,
        tz: &FixedOffset,
        now_ms: i64,
    ) -> Result<Vec<Reminder>> {
        require_owner(owner_id)?;
        let minute = period::minute_of_day(now_ms, tz)?;
        let rules = self.config.reminders.rules();
        let result = (|| -> Result<Vec<Reminder>> {
            // Pets come from both the event stream and stored configs, so
            // a pet with a config but no events still gets the
            // no-record-ever reminder.
            let mut pets: BTreeSet<String> = self.store.pet_ids(owner_id)?.into_iter().collect();
            for config in self.store.configs_for_owner(owner_id)? {
                pets.insert(config.pet_id);
            }

            let frequency_window = TimeWindow::new(
                now_ms - rules.frequency_window_hours * 3_600_000,
                now_ms,
            );
            let mut reminders = Vec::new();
            for pet_id in pets {
                let config = self.store.reminder_config(&pet_id, owner_id)?;
                let ctx = RuleContext {
                    now_ms,
                    minute_of_day: minute,
                    last_event_end_ms: self.store.last_event_end(owner_id, &pet_id)?,
                    abnormal_count: self.store.count_category(
                        owner_id,
                        &pet_id,
                        EventCategory::Abnormal,
                        frequency_window,
                    )?,
                };
                reminders.extend(evaluate_pet(&config, &rules, &ctx));
            }
            Ok(reminders)
        })();
        soften("evaluate_reminders", result)
    }
}

fn require_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(CoreError::MissingOwner);
    }
    Ok(())
}

fn parse_days(days: &BTreeSet<String>) -> Result<BTreeSet<NaiveDate>> {
    days.iter()
        .map(|day| {
            NaiveDate::parse_from_str(day, DAY_KEY_FORMAT)
                .map_err(|e| CoreError::InvalidPeriod(format!("bad day key '{day}': {e}")))
        })
        .collect()
}

/// Degrade read-path store failures to the zero value; everything else
/// (caller errors, validation) propagates untouched.
fn soften<T: Default>(op: &str, result: Result<T>) -> Result<T> {
    match result {
        Err(CoreError::Store(e)) => {
            log::warn!("{op}: store unavailable, serving empty result: {e}");
            Ok(T::default())
        }
        other => other,
    }
}
