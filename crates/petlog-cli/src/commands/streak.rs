use clap::Args;
use serde_json::json;

use super::{now_ms, open_engine, parse_tz};

#[derive(Args)]
pub struct StreakArgs {
    /// Owner account id
    #[arg(long)]
    pub owner: String,
    /// Timezone offset, e.g. +09:00
    #[arg(long)]
    pub tz: Option<String>,
}

pub fn run(args: StreakArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let tz = parse_tz(&args.tz)?;
    let now = now_ms();

    let streak = engine.streak(&args.owner, &tz, now)?;
    let badges = engine.badges(&args.owner, &tz, now)?;

    let output = json!({
        "streak_days": streak,
        "badges": badges,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
