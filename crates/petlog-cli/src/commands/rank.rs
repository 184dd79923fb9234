use clap::Args;
use petlog_core::{day_range, resolve, Page, PeriodKind};
use serde_json::json;

use super::{now_ms, open_engine, parse_tz};

#[derive(Args)]
pub struct RankArgs {
    /// Period: day | week | month | year | total
    #[arg(long, default_value = "total")]
    pub period: String,
    /// Timezone offset, e.g. +09:00
    #[arg(long)]
    pub tz: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
}

pub fn run(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let tz = parse_tz(&args.tz)?;
    let kind: PeriodKind = args.period.parse()?;

    let window = resolve(now_ms(), kind, &tz)?;
    let (start_day, end_day) = day_range(window, &tz)?;

    let size = args.page_size.unwrap_or(engine.config().ranking.page_size);
    let page = Page::new(args.page, size);
    let list = engine.rank(&start_day, &end_day, page)?;

    let output = json!({
        "list": list,
        "page": page.number,
        "page_size": page.size,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
