//! Care-event data model.
//!
//! An event is owned by the account that created it for its full
//! lifetime and may optionally be tied to one pet. Request bodies are
//! decoded once at the boundary into [`EventDraft`], whose optional
//! fields are explicit; business logic never probes untyped maps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};

/// Duration assumed when a draft carries neither duration nor start time.
pub const DEFAULT_DURATION_SECS: i64 = 300;

/// Category tag on an event. `Abnormal` feeds the frequency reminder rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Normal,
    Abnormal,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Normal => "normal",
            EventCategory::Abnormal => "abnormal",
        }
    }
}

/// A logged care event.
///
/// `start_ms`/`end_ms`/`created_ms` are epoch milliseconds;
/// `duration_secs` is the aggregated numeric field. Invariant:
/// `end_ms >= start_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    /// Pet this event belongs to, if any.
    pub pet_id: Option<String>,
    pub start_ms: i64,
    pub end_ms: i64,
    pub duration_secs: i64,
    pub category: EventCategory,
    #[serde(default)]
    pub note: Option<String>,
    pub created_ms: i64,
}

/// Incoming event payload with every optional field explicit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub start_ms: Option<i64>,
    #[serde(default)]
    pub end_ms: Option<i64>,
    #[serde(default)]
    pub duration_secs: Option<i64>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Event {
    /// Materialize a draft into a stored event.
    ///
    /// Missing fields default the way clients expect: end time falls back
    /// to `now_ms`, duration to [`DEFAULT_DURATION_SECS`], start time to
    /// `end - duration`, category to normal.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidTimeRange` if the resulting end
    /// time precedes the start time.
    pub fn from_draft(owner_id: &str, draft: EventDraft, now_ms: i64) -> Result<Self> {
        let end_ms = draft.end_ms.unwrap_or(now_ms);
        let duration_secs = draft.duration_secs.unwrap_or(DEFAULT_DURATION_SECS);
        let start_ms = draft.start_ms.unwrap_or(end_ms - duration_secs * 1000);

        if end_ms < start_ms {
            return Err(ValidationError::InvalidTimeRange { start_ms, end_ms }.into());
        }

        Ok(Event {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            pet_id: draft.pet_id,
            start_ms,
            end_ms,
            duration_secs,
            category: draft.category.unwrap_or(EventCategory::Normal),
            note: draft.note,
            created_ms: now_ms,
        })
    }
}
