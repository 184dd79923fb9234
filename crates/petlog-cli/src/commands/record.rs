use clap::Args;
use petlog_core::{EventCategory, EventDraft};

use super::{now_ms, open_engine, parse_tz};

#[derive(Args)]
pub struct RecordArgs {
    /// Owner account id
    #[arg(long)]
    pub owner: String,
    /// Pet the event belongs to
    #[arg(long)]
    pub pet: Option<String>,
    /// Event start, epoch milliseconds
    #[arg(long)]
    pub start_ms: Option<i64>,
    /// Event end, epoch milliseconds (defaults to now)
    #[arg(long)]
    pub end_ms: Option<i64>,
    /// Duration in seconds (defaults to 300)
    #[arg(long)]
    pub duration: Option<i64>,
    /// Category: normal | abnormal
    #[arg(long)]
    pub category: Option<String>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
    /// Timezone offset for day bucketing, e.g. +09:00
    #[arg(long)]
    pub tz: Option<String>,
}

pub fn run(args: RecordArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let tz = parse_tz(&args.tz)?;

    let category = match args.category.as_deref() {
        None => None,
        Some("normal") => Some(EventCategory::Normal),
        Some("abnormal") => Some(EventCategory::Abnormal),
        Some(other) => return Err(format!("unknown category: {other}").into()),
    };

    let draft = EventDraft {
        pet_id: args.pet,
        start_ms: args.start_ms,
        end_ms: args.end_ms,
        duration_secs: args.duration,
        category,
        note: args.note,
    };

    let event = engine.record_and_rollup(&args.owner, draft, &tz, now_ms())?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
