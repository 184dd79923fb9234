use clap::Subcommand;
use petlog_core::ConfigStore;

use super::{now_ms, open_engine, parse_tz};

#[derive(Subcommand)]
pub enum RemindAction {
    /// Evaluate reminder rules for every pet of an owner
    Check {
        /// Owner account id
        #[arg(long)]
        owner: String,
        /// Timezone offset, e.g. +09:00
        #[arg(long)]
        tz: Option<String>,
    },
    /// Show a pet's reminder configuration
    Show {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pet: String,
    },
    /// Update a pet's reminder configuration
    Set {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pet: String,
        /// Enable or disable the inactivity rule
        #[arg(long)]
        inactivity: Option<bool>,
        /// Enable or disable the frequency rule
        #[arg(long)]
        frequency: Option<bool>,
        /// Quiet window start, minute of day (0..1440)
        #[arg(long)]
        quiet_start: Option<u32>,
        /// Quiet window end, minute of day (0..1440)
        #[arg(long)]
        quiet_end: Option<u32>,
    },
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        RemindAction::Check { owner, tz } => {
            let tz = parse_tz(&tz)?;
            let reminders = engine.evaluate_reminders(&owner, &tz, now_ms())?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        RemindAction::Show { owner, pet } => {
            let config = engine.store().reminder_config(&pet, &owner)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        RemindAction::Set {
            owner,
            pet,
            inactivity,
            frequency,
            quiet_start,
            quiet_end,
        } => {
            let mut config = engine.store().reminder_config(&pet, &owner)?;
            if let Some(enabled) = inactivity {
                config.inactivity_enabled = enabled;
            }
            if let Some(enabled) = frequency {
                config.frequency_enabled = enabled;
            }
            if let Some(minute) = quiet_start {
                config.quiet_start_min = minute;
            }
            if let Some(minute) = quiet_end {
                config.quiet_end_min = minute;
            }
            engine.store().put_reminder_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
