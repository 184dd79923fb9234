//! Storage capability traits and the SQLite reference implementation.
//!
//! The engine never touches a process-wide handle; it receives a store
//! implementing these traits by injection. Implementations must provide
//! an atomic increment-or-insert for the rollup ledger and
//! read-committed snapshots for queries.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::FixedOffset;

use crate::aggregate::EventFilter;
use crate::error::StoreError;
use crate::event::{Event, EventCategory};
use crate::period::TimeWindow;
use crate::reminder::ReminderConfig;
use crate::rollup::{Page, RankEntry};

/// Event persistence and the read shapes the engine aggregates over.
pub trait EventStore {
    /// Persist a new event.
    fn insert_event(&self, event: &Event) -> Result<(), StoreError>;

    /// Events matching the filter, newest first by creation time.
    fn query_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    /// Distinct day keys (in `tz`) on which the owner has at least one
    /// event ending inside the window.
    fn distinct_days(
        &self,
        owner_id: &str,
        window: TimeWindow,
        tz: &FixedOffset,
    ) -> Result<BTreeSet<String>, StoreError>;

    /// End time of the owner's most recent event for one pet, if any.
    fn last_event_end(&self, owner_id: &str, pet_id: &str) -> Result<Option<i64>, StoreError>;

    /// Number of events with the given category ending inside the window.
    fn count_category(
        &self,
        owner_id: &str,
        pet_id: &str,
        category: EventCategory,
        window: TimeWindow,
    ) -> Result<i64, StoreError>;

    /// Distinct pet ids the owner has logged events for.
    fn pet_ids(&self, owner_id: &str) -> Result<Vec<String>, StoreError>;
}

/// Day-bucketed rollup counters for ranking.
pub trait RollupStore {
    /// Atomic upsert: create the (owner, day) row with count 1 or
    /// increment it by 1. Must not lose updates under concurrent callers.
    fn upsert_increment(&self, owner_id: &str, day: &str) -> Result<(), StoreError>;

    /// Owners ranked by summed counts over `day ∈ [start_day, end_day)`,
    /// total descending, owner id ascending on ties, paginated.
    fn range_sum(
        &self,
        start_day: &str,
        end_day: &str,
        page: Page,
    ) -> Result<Vec<RankEntry>, StoreError>;
}

/// Per-pet reminder configuration.
pub trait ConfigStore {
    /// The pet's reminder config. Absent configs are created with
    /// defaults and persisted before being returned.
    fn reminder_config(&self, pet_id: &str, owner_id: &str) -> Result<ReminderConfig, StoreError>;

    fn put_reminder_config(&self, config: &ReminderConfig) -> Result<(), StoreError>;

    /// Every stored config belonging to the owner.
    fn configs_for_owner(&self, owner_id: &str) -> Result<Vec<ReminderConfig>, StoreError>;
}

/// Returns `~/.config/petlog[-dev]/` based on PETLOG_ENV, or the
/// directory named by PETLOG_DATA_DIR when set.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var("PETLOG_DATA_DIR") {
        Ok(explicit) if !explicit.trim().is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PETLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("petlog-dev")
            } else {
                base_dir.join("petlog")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
