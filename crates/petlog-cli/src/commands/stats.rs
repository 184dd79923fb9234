use clap::Subcommand;
use petlog_core::{category_breakdown, EventFilter, Page, PeriodKind};

use super::{now_ms, open_engine, parse_tz};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Summary over a period
    Summary {
        /// Owner account id
        #[arg(long)]
        owner: String,
        /// Restrict to one pet
        #[arg(long)]
        pet: Option<String>,
        /// Period: day | week | month | year | all
        #[arg(long, default_value = "week")]
        period: String,
        /// Timezone offset, e.g. +09:00
        #[arg(long)]
        tz: Option<String>,
    },
    /// Paged events plus summary over the same filter
    Overview {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pet: Option<String>,
        #[arg(long, default_value = "week")]
        period: String,
        #[arg(long)]
        tz: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Per-day category breakdown
    Days {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        pet: Option<String>,
        #[arg(long, default_value = "month")]
        period: String,
        #[arg(long)]
        tz: Option<String>,
    },
}

fn filter_for(
    owner: String,
    pet: Option<String>,
    period: &str,
    tz: &chrono::FixedOffset,
) -> Result<EventFilter, Box<dyn std::error::Error>> {
    let kind: PeriodKind = period.parse()?;
    let window = petlog_core::resolve(now_ms(), kind, tz)?;
    let mut filter = EventFilter::owner(owner).with_window(window);
    filter.pet_id = pet;
    Ok(filter)
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        StatsAction::Summary { owner, pet, period, tz } => {
            let tz = parse_tz(&tz)?;
            let filter = filter_for(owner, pet, &period, &tz)?;
            let summary = engine.aggregate(&filter)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Overview { owner, pet, period, tz, page, page_size } => {
            let tz = parse_tz(&tz)?;
            let filter = filter_for(owner, pet, &period, &tz)?;
            let size = page_size.unwrap_or(engine.config().ranking.page_size);
            let overview = engine.overview(&filter, Page::new(page, size))?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        StatsAction::Days { owner, pet, period, tz } => {
            let tz = parse_tz(&tz)?;
            let filter = filter_for(owner, pet, &period, &tz)?;
            let overview = engine.overview(&filter, Page::new(1, u32::MAX))?;
            let days = category_breakdown(&overview.items, &tz)?;
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(())
}
