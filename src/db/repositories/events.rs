use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{coarse_lower_bound, threshold_for_hours, to_i64},
    Database,
};
use crate::models::{EventRecord, EventType};

const SELECT_COLUMNS: &str =
    "SELECT timestamp, event_type, details, app_name, window_title, context_action FROM events";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRecord> {
    let event_type: String = row.get(1)?;
    Ok(EventRecord {
        timestamp: row.get(0)?,
        event_type: EventType::from(event_type),
        details: row.get(2)?,
        app_name: row.get(3)?,
        window_title: row.get(4)?,
        context_action: row.get(5)?,
    })
}

impl Database {
    pub async fn insert_event(&self, event: &EventRecord) -> Result<()> {
        self.insert_events(std::slice::from_ref(event)).await
    }

    pub async fn insert_events(&self, events: &[EventRecord]) -> Result<()> {
        let records = events.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction().context("failed to open insert transaction")?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO events (timestamp, event_type, details, app_name, window_title, context_action)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for record in &records {
                    stmt.execute(params![
                        record.timestamp,
                        record.event_type.as_str(),
                        record.details,
                        record.app_name,
                        record.window_title,
                        record.context_action,
                    ])
                    .with_context(|| format!("failed to insert event at {}", record.timestamp))?;
                }
            }
            tx.commit().context("failed to commit events")?;
            Ok(())
        })
        .await
    }

    /// Events strictly after `threshold`, oldest first.
    ///
    /// Rows whose timestamp cannot be parsed have no place in a time window
    /// and are skipped.
    pub async fn events_since(&self, threshold: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        let lower_bound = coarse_lower_bound(threshold);
        let candidates = self
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS} WHERE timestamp >= ?1 ORDER BY id ASC"
                ))?;
                let rows = stmt.query_map(params![lower_bound], event_from_row)?;

                let mut events = Vec::new();
                for row in rows {
                    events.push(row.context("failed to read event row")?);
                }
                Ok(events)
            })
            .await?;

        let mut events: Vec<(DateTime<Utc>, EventRecord)> = candidates
            .into_iter()
            .filter_map(|event| event.parsed_timestamp().map(|at| (at, event)))
            .filter(|(at, _)| *at > threshold)
            .collect();
        events.sort_by_key(|(at, _)| *at);
        Ok(events.into_iter().map(|(_, event)| event).collect())
    }

    /// Events from the last `hours` hours, oldest first.
    pub async fn recent_events(&self, hours: u32) -> Result<Vec<EventRecord>> {
        self.events_since(threshold_for_hours(Utc::now(), hours))
            .await
    }

    /// The `limit` most recent events, oldest first.
    pub async fn latest_events(&self, limit: u64) -> Result<Vec<EventRecord>> {
        let limit = to_i64(limit)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM ({SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT ?1)
                 ORDER BY timestamp ASC"
            ))?;
            let rows = stmt.query_map(params![limit], event_from_row)?;

            let mut events = Vec::new();
            for row in rows {
                events.push(row.context("failed to read event row")?);
            }
            Ok(events)
        })
        .await
    }

    pub async fn count_events(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
                .context("failed to count events")?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    pub async fn clear_events(&self) -> Result<usize> {
        self.execute(|conn| {
            conn.execute("DELETE FROM events", [])
                .context("failed to clear events")
        })
        .await
    }
}
