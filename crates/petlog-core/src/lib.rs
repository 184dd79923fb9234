//! # Petlog Core Library
//!
//! Core business logic for the petlog habit-tracking backend. Owners log
//! timestamped care events, optionally tied to a pet, and the engine
//! serves period statistics, a day-bucketed leaderboard, streak-based
//! achievement badges, and rule-based reminders with quiet hours.
//!
//! ## Architecture
//!
//! - **Period Resolver**: reference instant + period selector + explicit
//!   timezone offset -> half-open millisecond window
//! - **Aggregator**: count/sum/max/floor-average over an owner/pet/window
//!   filter, one pure summarize shared by every call site
//! - **Daily Rollup Ledger**: atomic per-(owner, day) counters backing the
//!   leaderboard range queries
//! - **Streak Calculator**: consecutive-active-day runs ending today,
//!   bounded by a configured horizon
//! - **Reminder Rule Engine**: per-pet inactivity and abnormal-frequency
//!   rules with quiet-hour suppression
//!
//! Storage is an injected capability ([`store::EventStore`],
//! [`store::RollupStore`], [`store::ConfigStore`]); [`SqliteStore`] is the
//! bundled implementation. The engine performs no I/O of its own.

pub mod achievement;
pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod period;
pub mod reminder;
pub mod rollup;
pub mod store;
pub mod streak;

pub use achievement::{unlocked_badges, Badge};
pub use aggregate::{category_breakdown, summarize, DayCategoryCounts, EventFilter, Summary};
pub use config::EngineConfig;
pub use engine::{Engine, Overview};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use event::{Event, EventCategory, EventDraft};
pub use period::{day_key, resolve, PeriodKind, TimeWindow};
pub use reminder::{Reminder, ReminderConfig, ReminderKind};
pub use rollup::{day_range, Page, RankEntry};
pub use store::{ConfigStore, EventStore, RollupStore, SqliteStore};
pub use streak::streak_length;
