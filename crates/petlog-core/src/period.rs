//! Period resolution: reference instant + period selector -> half-open window.
//!
//! All windows are half-open millisecond ranges `[start_ms, end_ms)` in a
//! caller-supplied fixed timezone offset. Day boundaries are local
//! midnights of that offset, never the host timezone.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

/// Fixed-width day-bucket key format. Zero padding keeps lexicographic
/// order equal to chronological order, which the rollup range queries
/// rely on.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Period selector for statistics and ranking windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
    /// Everything up to and including the reference day.
    All,
}

impl FromStr for PeriodKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(PeriodKind::Day),
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "year" => Ok(PeriodKind::Year),
            // "total" is the legacy spelling used by older clients.
            "all" | "total" => Ok(PeriodKind::All),
            other => Err(CoreError::InvalidPeriod(other.to_string())),
        }
    }
}

/// Half-open time window `[start_ms, end_ms)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whether `ms` falls inside the window (start inclusive, end exclusive).
    pub fn contains(&self, ms: i64) -> bool {
        ms >= self.start_ms && ms < self.end_ms
    }
}

/// Resolve a reference instant and period selector into a half-open window.
///
/// Guarantees `end_ms > start_ms` and, for the calendar periods,
/// `start_ms <= ref_ms < end_ms`.
///
/// # Errors
/// Returns `ValidationError::TimestampOutOfRange` if `ref_ms` cannot be
/// represented as a calendar date.
pub fn resolve(ref_ms: i64, kind: PeriodKind, tz: &FixedOffset) -> Result<TimeWindow> {
    let local = local_datetime(ref_ms, tz)?;
    let today = local.date_naive();

    let window = match kind {
        PeriodKind::Day => {
            let start = midnight_ms(today, tz)?;
            let end = midnight_ms(next_day(today, ref_ms)?, tz)?;
            TimeWindow::new(start, end)
        }
        PeriodKind::Week => {
            // Monday=1 .. Sunday=7, so Sunday belongs to the week that
            // started six days earlier.
            let idx = today.weekday().number_from_monday() as u64;
            let monday = today
                .checked_sub_days(Days::new(idx - 1))
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            let next_monday = monday
                .checked_add_days(Days::new(7))
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            TimeWindow::new(midnight_ms(monday, tz)?, midnight_ms(next_monday, tz)?)
        }
        PeriodKind::Month => {
            let first = today
                .with_day(1)
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            // Calendar addition, so December rolls into January and month
            // lengths never enter into it.
            let next_first = first
                .checked_add_months(Months::new(1))
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            TimeWindow::new(midnight_ms(first, tz)?, midnight_ms(next_first, tz)?)
        }
        PeriodKind::Year => {
            let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            let next_jan1 = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
            TimeWindow::new(midnight_ms(jan1, tz)?, midnight_ms(next_jan1, tz)?)
        }
        PeriodKind::All => {
            // Upper bound is tomorrow's midnight so events from the
            // reference day survive the exclusive end.
            let end = midnight_ms(next_day(today, ref_ms)?, tz)?;
            TimeWindow::new(0, end)
        }
    };

    Ok(window)
}

/// Window spanning from local midnight `days_back` days before the
/// reference instant to the local midnight after it, half-open. Used for
/// bounded lookbacks such as the streak horizon.
pub fn lookback_window(ref_ms: i64, days_back: u32, tz: &FixedOffset) -> Result<TimeWindow> {
    let today = local_date(ref_ms, tz)?;
    let first = today
        .checked_sub_days(Days::new(days_back as u64))
        .ok_or(ValidationError::TimestampOutOfRange(ref_ms))?;
    Ok(TimeWindow::new(
        midnight_ms(first, tz)?,
        midnight_ms(next_day(today, ref_ms)?, tz)?,
    ))
}

/// Day-bucket key (`YYYY-MM-DD`) of an instant in the given offset.
pub fn day_key(ms: i64, tz: &FixedOffset) -> Result<String> {
    Ok(local_datetime(ms, tz)?.format(DAY_KEY_FORMAT).to_string())
}

/// Calendar date of an instant in the given offset.
pub fn local_date(ms: i64, tz: &FixedOffset) -> Result<NaiveDate> {
    Ok(local_datetime(ms, tz)?.date_naive())
}

/// Minute of day (0..1440) of an instant in the given offset.
pub fn minute_of_day(ms: i64, tz: &FixedOffset) -> Result<u32> {
    let local = local_datetime(ms, tz)?;
    Ok(local.hour() * 60 + local.minute())
}

fn local_datetime(ms: i64, tz: &FixedOffset) -> Result<DateTime<FixedOffset>> {
    let utc = Utc
        .timestamp_millis_opt(ms)
        .single()
        .ok_or(ValidationError::TimestampOutOfRange(ms))?;
    Ok(utc.with_timezone(tz))
}

fn midnight_ms(date: NaiveDate, tz: &FixedOffset) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(*tz).single())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "date",
            message: format!("no local midnight for {date}"),
        })?;
    Ok(midnight.timestamp_millis())
}

fn next_day(date: NaiveDate, ref_ms: i64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| ValidationError::TimestampOutOfRange(ref_ms).into())
}
