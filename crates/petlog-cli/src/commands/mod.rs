pub mod config;
pub mod rank;
pub mod record;
pub mod remind;
pub mod stats;
pub mod streak;

use chrono::{FixedOffset, Utc};
use petlog_core::{Engine, EngineConfig, SqliteStore};

/// Open the default store together with the on-disk engine configuration.
pub fn open_engine() -> Result<Engine<SqliteStore>, Box<dyn std::error::Error>> {
    let store = SqliteStore::open_default()?;
    Ok(Engine::with_config(store, EngineConfig::load_or_default()))
}

/// Parse a fixed offset like `+09:00`; UTC when absent.
pub fn parse_tz(tz: &Option<String>) -> Result<FixedOffset, Box<dyn std::error::Error>> {
    match tz {
        Some(s) => s
            .parse::<FixedOffset>()
            .map_err(|e| format!("invalid timezone offset '{s}': {e}").into()),
        None => Ok(FixedOffset::east_opt(0).unwrap()),
    }
}

/// Current instant in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
