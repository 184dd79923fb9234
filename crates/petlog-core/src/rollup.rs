//! Daily rollup ledger types for the leaderboard.
//!
//! One counter exists per (owner, local calendar day), incremented by the
//! write path on each qualifying event. Day keys are fixed-width
//! `YYYY-MM-DD` strings, so `day >= start AND day < end` range scans are
//! chronological. Counters are never decremented: event updates and
//! deletions happen outside the engine and do not correct the ledger.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::period::{day_key, TimeWindow};

/// One leaderboard row: an owner and their summed day counts.
///
/// Rows with equal totals order by `owner_id` ascending so pagination is
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub owner_id: String,
    pub total_count: i64,
}

/// 1-based page selector for ranked queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 20,
        }
    }
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.number - 1) * self.size
    }
}

/// Convert a millisecond window into the half-open day-key span
/// `[start_day, end_day)` used by rollup range queries.
pub fn day_range(window: TimeWindow, tz: &FixedOffset) -> Result<(String, String)> {
    Ok((day_key(window.start_ms, tz)?, day_key(window.end_ms, tz)?))
}
