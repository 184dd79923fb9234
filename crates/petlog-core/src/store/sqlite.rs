//! SQLite-backed store implementing every storage capability.
//!
//! A single connection is shared behind a mutex so one handle can serve
//! concurrent callers; the rollup increment is a single SQL upsert, so
//! it stays atomic regardless of how callers interleave.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::FixedOffset;
use rusqlite::{params, Connection, OptionalExtension};

use crate::aggregate::EventFilter;
use crate::error::StoreError;
use crate::event::{Event, EventCategory};
use crate::period::{day_key, TimeWindow};
use crate::reminder::ReminderConfig;
use crate::rollup::{Page, RankEntry};

use super::{data_dir, migrations, ConfigStore, EventStore, RollupStore};

/// Parse an event category from its stored string, defaulting unknown
/// values to normal.
fn parse_category(category_str: &str) -> EventCategory {
    match category_str {
        "abnormal" => EventCategory::Abnormal,
        _ => EventCategory::Normal,
    }
}

/// SQLite store for events, rollup counters, and reminder configs.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at the given path, creating and migrating the
    /// schema as needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open the store at `data_dir()/petlog.db`.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()?)
    }

    /// Default database path under the data directory.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        Ok(data_dir()?.join("petlog.db"))
    }

    /// Open an ephemeral in-memory store.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::QueryFailed("connection mutex poisoned".to_string()))
    }
}

impl EventStore for SqliteStore {
    fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO events (id, owner_id, pet_id, start_ms, end_ms, duration_secs, category, note, created_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                event.id,
                event.owner_id,
                event.pet_id,
                event.start_ms,
                event.end_ms,
                event.duration_secs,
                event.category.as_str(),
                event.note,
                event.created_ms,
            ],
        )?;
        Ok(())
    }

    fn query_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        // One statement for every filter shape; absent predicates relax
        // to the full range instead of growing the SQL ad hoc.
        let (start_ms, end_ms) = match filter.window {
            Some(w) => (w.start_ms, w.end_ms),
            None => (i64::MIN, i64::MAX),
        };
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, pet_id, start_ms, end_ms, duration_secs, category, note, created_ms
             FROM events
             WHERE owner_id = ?1
               AND (?2 IS NULL OR pet_id = ?2)
               AND end_ms >= ?3 AND end_ms < ?4
             ORDER BY created_ms DESC, id ASC",
        )?;
        let rows = stmt.query_map(
            params![filter.owner_id, filter.pet_id, start_ms, end_ms],
            |row| {
                Ok(Event {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    pet_id: row.get(2)?,
                    start_ms: row.get(3)?,
                    end_ms: row.get(4)?,
                    duration_secs: row.get(5)?,
                    category: parse_category(&row.get::<_, String>(6)?),
                    note: row.get(7)?,
                    created_ms: row.get(8)?,
                })
            },
        )?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    fn distinct_days(
        &self,
        owner_id: &str,
        window: TimeWindow,
        tz: &FixedOffset,
    ) -> Result<BTreeSet<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT end_ms FROM events WHERE owner_id = ?1 AND end_ms >= ?2 AND end_ms < ?3",
        )?;
        let rows = stmt.query_map(params![owner_id, window.start_ms, window.end_ms], |row| {
            row.get::<_, i64>(0)
        })?;
        // Day bucketing happens here, in the owner's offset, not in SQL
        // with the host timezone.
        let mut days = BTreeSet::new();
        for row in rows {
            let end_ms = row?;
            let key = day_key(end_ms, tz)
                .map_err(|e| StoreError::QueryFailed(format!("day bucketing: {e}")))?;
            days.insert(key);
        }
        Ok(days)
    }

    fn last_event_end(&self, owner_id: &str, pet_id: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.lock()?;
        let last = conn.query_row(
            "SELECT MAX(end_ms) FROM events WHERE owner_id = ?1 AND pet_id = ?2",
            params![owner_id, pet_id],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        Ok(last)
    }

    fn count_category(
        &self,
        owner_id: &str,
        pet_id: &str,
        category: EventCategory,
        window: TimeWindow,
    ) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM events
             WHERE owner_id = ?1 AND pet_id = ?2 AND category = ?3
               AND end_ms >= ?4 AND end_ms < ?5",
            params![
                owner_id,
                pet_id,
                category.as_str(),
                window.start_ms,
                window.end_ms
            ],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn pet_ids(&self, owner_id: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT pet_id FROM events
             WHERE owner_id = ?1 AND pet_id IS NOT NULL
             ORDER BY pet_id",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}

impl RollupStore for SqliteStore {
    fn upsert_increment(&self, owner_id: &str, day: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        // Single-statement upsert; never read-modify-write from here.
        conn.execute(
            "INSERT INTO daily_rollup (owner_id, day, count) VALUES (?1, ?2, 1)
             ON CONFLICT(owner_id, day) DO UPDATE SET count = count + 1",
            params![owner_id, day],
        )?;
        Ok(())
    }

    fn range_sum(
        &self,
        start_day: &str,
        end_day: &str,
        page: Page,
    ) -> Result<Vec<RankEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT owner_id, SUM(count) AS total
             FROM daily_rollup
             WHERE day >= ?1 AND day < ?2
             GROUP BY owner_id
             ORDER BY total DESC, owner_id ASC
             LIMIT ?3 OFFSET ?4",
        )?;
        let rows = stmt.query_map(
            params![start_day, end_day, page.size, page.offset()],
            |row| {
                Ok(RankEntry {
                    owner_id: row.get(0)?,
                    total_count: row.get(1)?,
                })
            },
        )?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

impl ConfigStore for SqliteStore {
    fn reminder_config(&self, pet_id: &str, owner_id: &str) -> Result<ReminderConfig, StoreError> {
        let conn = self.lock()?;
        let existing = conn
            .query_row(
                "SELECT inactivity_enabled, frequency_enabled, quiet_start_min, quiet_end_min
                 FROM reminder_config WHERE pet_id = ?1 AND owner_id = ?2",
                params![pet_id, owner_id],
                |row| {
                    Ok(ReminderConfig {
                        pet_id: pet_id.to_string(),
                        owner_id: owner_id.to_string(),
                        inactivity_enabled: row.get(0)?,
                        frequency_enabled: row.get(1)?,
                        quiet_start_min: row.get(2)?,
                        quiet_end_min: row.get(3)?,
                    })
                },
            )
            .optional()?;

        match existing {
            Some(config) => Ok(config),
            None => {
                // First access creates the row with defaults.
                let config = ReminderConfig::defaults_for(pet_id, owner_id);
                conn.execute(
                    "INSERT OR IGNORE INTO reminder_config
                     (pet_id, owner_id, inactivity_enabled, frequency_enabled, quiet_start_min, quiet_end_min)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        config.pet_id,
                        config.owner_id,
                        config.inactivity_enabled,
                        config.frequency_enabled,
                        config.quiet_start_min,
                        config.quiet_end_min,
                    ],
                )?;
                Ok(config)
            }
        }
    }

    fn put_reminder_config(&self, config: &ReminderConfig) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO reminder_config
             (pet_id, owner_id, inactivity_enabled, frequency_enabled, quiet_start_min, quiet_end_min)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(pet_id, owner_id) DO UPDATE SET
                inactivity_enabled = excluded.inactivity_enabled,
                frequency_enabled = excluded.frequency_enabled,
                quiet_start_min = excluded.quiet_start_min,
                quiet_end_min = excluded.quiet_end_min",
            params![
                config.pet_id,
                config.owner_id,
                config.inactivity_enabled,
                config.frequency_enabled,
                config.quiet_start_min,
                config.quiet_end_min,
            ],
        )?;
        Ok(())
    }

    fn configs_for_owner(&self, owner_id: &str) -> Result<Vec<ReminderConfig>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT pet_id, inactivity_enabled, frequency_enabled, quiet_start_min, quiet_end_min
             FROM reminder_config WHERE owner_id = ?1 ORDER BY pet_id",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| {
            Ok(ReminderConfig {
                pet_id: row.get(0)?,
                owner_id: owner_id.to_string(),
                inactivity_enabled: row.get(1)?,
                frequency_enabled: row.get(2)?,
                quiet_start_min: row.get(3)?,
                quiet_end_min: row.get(4)?,
            })
        })?;
        let mut configs = Vec::new();
        for row in rows {
            configs.push(row?);
        }
        Ok(configs)
    }
}
