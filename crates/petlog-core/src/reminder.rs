//! Per-pet reminder rules with quiet-hour suppression.
//!
//! Evaluation is a pure function of the clock, the pet's config, its last
//! event time, and its recent abnormal count; nothing is persisted
//! between calls. When both rules fire, inactivity always precedes
//! frequency in the output so consumers can assert on order.

use serde::{Deserialize, Serialize};

/// Per-pet reminder configuration. Created with defaults (both rules on,
/// no quiet window) the first time a pet's config is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub pet_id: String,
    pub owner_id: String,
    pub inactivity_enabled: bool,
    pub frequency_enabled: bool,
    /// Quiet window start, minute of day (0..1440).
    pub quiet_start_min: u32,
    /// Quiet window end, minute of day (0..1440), exclusive. May be below
    /// `quiet_start_min`, in which case the window wraps midnight.
    pub quiet_end_min: u32,
}

impl ReminderConfig {
    pub fn defaults_for(pet_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            pet_id: pet_id.into(),
            owner_id: owner_id.into(),
            inactivity_enabled: true,
            frequency_enabled: true,
            quiet_start_min: 0,
            quiet_end_min: 0,
        }
    }

    /// Whether reminders are suppressed at the given minute of day.
    pub fn is_quiet(&self, minute_of_day: u32) -> bool {
        in_quiet_window(minute_of_day, self.quiet_start_min, self.quiet_end_min)
    }
}

/// Quiet-window test, wrapping past midnight when `start > end`.
/// `(0, 0)` means no quiet window at all.
pub fn in_quiet_window(minute_of_day: u32, start_min: u32, end_min: u32) -> bool {
    if start_min == 0 && end_min == 0 {
        return false;
    }
    if start_min <= end_min {
        minute_of_day >= start_min && minute_of_day < end_min
    } else {
        minute_of_day >= start_min || minute_of_day < end_min
    }
}

/// Reminder rule kind, stable wire identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderKind {
    #[serde(rename = "no_record_48h")]
    NoRecord48h,
    #[serde(rename = "frequency_24h")]
    Frequency24h,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::NoRecord48h => "no_record_48h",
            ReminderKind::Frequency24h => "frequency_24h",
        }
    }
}

/// A reminder the caller should deliver. Delivery is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub pet_id: String,
    pub kind: ReminderKind,
    pub message: String,
}

/// Rule thresholds, normally sourced from
/// [`crate::config::ReminderRulesConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRules {
    pub inactivity_after_hours: i64,
    pub frequency_window_hours: i64,
    pub frequency_min_count: i64,
}

impl Default for ReminderRules {
    fn default() -> Self {
        Self {
            inactivity_after_hours: 48,
            frequency_window_hours: 24,
            frequency_min_count: 2,
        }
    }
}

/// Observations about one pet at evaluation time.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub now_ms: i64,
    /// Minute of day of `now_ms` in the owner's timezone.
    pub minute_of_day: u32,
    /// End time of the pet's most recent event, if it has any.
    pub last_event_end_ms: Option<i64>,
    /// Abnormal-category events in `[now - frequency_window, now)`.
    pub abnormal_count: i64,
}

/// Evaluate both rules for one pet. Returns an empty list during the
/// quiet window; otherwise each enabled rule fires independently, in a
/// fixed order (inactivity, then frequency).
pub fn evaluate_pet(
    config: &ReminderConfig,
    rules: &ReminderRules,
    ctx: &RuleContext,
) -> Vec<Reminder> {
    if config.is_quiet(ctx.minute_of_day) {
        return Vec::new();
    }

    let mut reminders = Vec::new();

    if config.inactivity_enabled && inactivity_fires(rules, ctx) {
        reminders.push(Reminder {
            pet_id: config.pet_id.clone(),
            kind: ReminderKind::NoRecord48h,
            message: format!(
                "No activity recorded for pet {} in the last {} hours.",
                config.pet_id, rules.inactivity_after_hours
            ),
        });
    }

    if config.frequency_enabled && ctx.abnormal_count >= rules.frequency_min_count {
        reminders.push(Reminder {
            pet_id: config.pet_id.clone(),
            kind: ReminderKind::Frequency24h,
            message: format!(
                "{} abnormal events for pet {} in the last {} hours.",
                ctx.abnormal_count, config.pet_id, rules.frequency_window_hours
            ),
        });
    }

    reminders
}

fn inactivity_fires(rules: &ReminderRules, ctx: &RuleContext) -> bool {
    match ctx.last_event_end_ms {
        None => true,
        Some(last) => ctx.now_ms - last >= rules.inactivity_after_hours * 3_600_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn ctx(now_ms: i64, minute_of_day: u32) -> RuleContext {
        RuleContext {
            now_ms,
            minute_of_day,
            last_event_end_ms: None,
            abnormal_count: 0,
        }
    }

    #[test]
    fn zero_zero_never_suppresses() {
        assert!(!in_quiet_window(0, 0, 0));
        assert!(!in_quiet_window(720, 0, 0));
        assert!(!in_quiet_window(1439, 0, 0));
    }

    #[test]
    fn plain_window_suppresses_half_open() {
        let (qs, qe) = (9 * 60, 17 * 60);
        assert!(!in_quiet_window(9 * 60 - 1, qs, qe));
        assert!(in_quiet_window(9 * 60, qs, qe));
        assert!(in_quiet_window(12 * 60, qs, qe));
        assert!(!in_quiet_window(17 * 60, qs, qe));
    }

    #[test]
    fn wrapped_window_covers_both_sides_of_midnight() {
        let (qs, qe) = (22 * 60, 6 * 60);
        assert!(in_quiet_window(23 * 60, qs, qe));
        assert!(in_quiet_window(2 * 60, qs, qe));
        assert!(!in_quiet_window(10 * 60, qs, qe));
        assert!(in_quiet_window(qs, qs, qe));
        assert!(!in_quiet_window(qe, qs, qe));
    }

    #[test]
    fn inactivity_fires_after_threshold() {
        let config = ReminderConfig::defaults_for("p1", "u1");
        let rules = ReminderRules::default();
        let now = 100 * HOUR_MS;

        let mut c = ctx(now, 600);
        c.last_event_end_ms = Some(now - 49 * HOUR_MS);
        let fired = evaluate_pet(&config, &rules, &c);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, ReminderKind::NoRecord48h);

        c.last_event_end_ms = Some(now - 2 * HOUR_MS);
        assert!(evaluate_pet(&config, &rules, &c).is_empty());
    }

    #[test]
    fn inactivity_fires_when_no_event_ever() {
        let config = ReminderConfig::defaults_for("p1", "u1");
        let fired = evaluate_pet(&config, &ReminderRules::default(), &ctx(1_000, 600));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, ReminderKind::NoRecord48h);
    }

    #[test]
    fn exact_threshold_boundary_fires() {
        let config = ReminderConfig::defaults_for("p1", "u1");
        let rules = ReminderRules::default();
        let now = 100 * HOUR_MS;
        let mut c = ctx(now, 600);
        c.last_event_end_ms = Some(now - 48 * HOUR_MS);
        assert_eq!(evaluate_pet(&config, &rules, &c).len(), 1);
    }

    #[test]
    fn frequency_needs_two_abnormal_events() {
        let config = ReminderConfig::defaults_for("p1", "u1");
        let rules = ReminderRules::default();
        let now = 100 * HOUR_MS;

        let mut c = ctx(now, 600);
        c.last_event_end_ms = Some(now - HOUR_MS);
        c.abnormal_count = 2;
        let fired = evaluate_pet(&config, &rules, &c);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, ReminderKind::Frequency24h);

        c.abnormal_count = 1;
        assert!(evaluate_pet(&config, &rules, &c).is_empty());
    }

    #[test]
    fn both_rules_fire_in_fixed_order() {
        let config = ReminderConfig::defaults_for("p1", "u1");
        let rules = ReminderRules::default();
        let mut c = ctx(100 * HOUR_MS, 600);
        c.abnormal_count = 3;
        let fired = evaluate_pet(&config, &rules, &c);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].kind, ReminderKind::NoRecord48h);
        assert_eq!(fired[1].kind, ReminderKind::Frequency24h);
    }

    #[test]
    fn quiet_window_suppresses_everything() {
        let mut config = ReminderConfig::defaults_for("p1", "u1");
        config.quiet_start_min = 22 * 60;
        config.quiet_end_min = 6 * 60;
        let mut c = ctx(100 * HOUR_MS, 23 * 60);
        c.abnormal_count = 5;
        assert!(evaluate_pet(&config, &ReminderRules::default(), &c).is_empty());

        c.minute_of_day = 10 * 60;
        assert_eq!(evaluate_pet(&config, &ReminderRules::default(), &c).len(), 2);
    }

    #[test]
    fn disabled_rules_stay_silent() {
        let mut config = ReminderConfig::defaults_for("p1", "u1");
        config.inactivity_enabled = false;
        config.frequency_enabled = false;
        let mut c = ctx(100 * HOUR_MS, 600);
        c.abnormal_count = 5;
        assert!(evaluate_pet(&config, &ReminderRules::default(), &c).is_empty());
    }

    #[test]
    fn kind_wire_names_are_stable() {
        assert_eq!(ReminderKind::NoRecord48h.as_str(), "no_record_48h");
        assert_eq!(
            serde_json::to_string(&ReminderKind::Frequency24h).unwrap(),
            r#""frequency_24h""#
        );
    }
}
