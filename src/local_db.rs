//! SQLite-backed local calendar store.
//!
//! The destination database that remote calendars are imported into;
//! it stands in for the device calendar application in a full
//! deployment. The sync engine only talks to it through the
//! [`LocalStore`] trait.

use std::path::Path;

use chrono::{DateTime, Utc};
use gcalsync_core::error::{SyncError, SyncResult};
use gcalsync_core::local::{
    ColorPolicy, LocalCalendar, LocalEvent, LocalStore, NewCalendar, NewEvent,
};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Colors handed out to new calendars, in order.
const COLOR_PALETTE: &[&str] = &[
    "blue", "green", "red", "orange", "purple", "teal", "brown", "magenta",
];

pub struct CalendarDb {
    conn: Connection,
}

impl CalendarDb {
    pub fn open(path: &Path) -> SyncResult<Self> {
        let conn = Connection::open(path)?;
        let db = CalendarDb { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// In-memory calendar store (for tests).
    pub fn open_in_memory() -> SyncResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = CalendarDb { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> SyncResult<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS local_calendars (
                id             TEXT PRIMARY KEY,
                title          TEXT NOT NULL,
                color          TEXT NOT NULL,
                visible        INTEGER NOT NULL,
                sync_enabled   INTEGER NOT NULL,
                source_tag     TEXT NOT NULL,
                source_version TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS local_events (
                id          TEXT PRIMARY KEY,
                calendar_id TEXT NOT NULL REFERENCES local_calendars(id),
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                location    TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn next_free_color(&self) -> SyncResult<String> {
        let used: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM local_calendars", [], |row| row.get(0))?;
        Ok(COLOR_PALETTE[used % COLOR_PALETTE.len()].to_string())
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}

impl LocalStore for CalendarDb {
    fn create_calendar(&mut self, attrs: &NewCalendar) -> SyncResult<String> {
        let id = Uuid::new_v4().to_string();
        let color = match attrs.color {
            ColorPolicy::NextFree => self.next_free_color()?,
        };

        self.conn
            .execute(
                "INSERT INTO local_calendars
                     (id, title, color, visible, sync_enabled, source_tag, source_version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    attrs.title,
                    color,
                    attrs.visible,
                    attrs.sync_enabled,
                    attrs.source_tag,
                    attrs.source_version,
                ],
            )
            .map_err(|e| SyncError::Create(e.to_string()))?;

        Ok(id)
    }

    fn calendar_by_id(&self, id: &str) -> SyncResult<Option<LocalCalendar>> {
        let calendar = self
            .conn
            .query_row(
                "SELECT id, title, color, visible, sync_enabled, source_tag, source_version
                 FROM local_calendars WHERE id = ?1",
                params![id],
                |row| {
                    Ok(LocalCalendar {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        color: row.get(2)?,
                        visible: row.get(3)?,
                        sync_enabled: row.get(4)?,
                        source_tag: row.get(5)?,
                        source_version: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(calendar)
    }

    fn create_event(&mut self, calendar_id: &str, attrs: &NewEvent) -> SyncResult<String> {
        let id = Uuid::new_v4().to_string();

        self.conn
            .execute(
                "INSERT INTO local_events
                     (id, calendar_id, title, description, location, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    calendar_id,
                    attrs.title,
                    attrs.description,
                    attrs.location,
                    attrs.start.to_rfc3339(),
                    attrs.end.to_rfc3339(),
                ],
            )
            .map_err(|e| SyncError::Create(e.to_string()))?;

        Ok(id)
    }

    fn event_by_id(&self, id: &str) -> SyncResult<Option<LocalEvent>> {
        let event = self
            .conn
            .query_row(
                "SELECT id, title, description, location, start_time, end_time
                 FROM local_events WHERE id = ?1",
                params![id],
                |row| {
                    let start: String = row.get(4)?;
                    let end: String = row.get(5)?;
                    Ok(LocalEvent {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        location: row.get(3)?,
                        start: parse_time(&start)?,
                        end: parse_time(&end)?,
                    })
                },
            )
            .optional()?;

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_event(title: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "daily sync".to_string(),
            location: String::new(),
            start: Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn calendar_round_trips() {
        let mut db = CalendarDb::open_in_memory().unwrap();

        let id = db.create_calendar(&NewCalendar::imported("Work")).unwrap();
        assert!(!id.is_empty());

        let calendar = db.calendar_by_id(&id).unwrap().unwrap();
        assert_eq!(calendar.title, "Work");
        assert!(!calendar.visible);
        assert!(calendar.sync_enabled);
        assert_eq!(calendar.source_tag, "remote-sync");
        assert_eq!(calendar.source_version, "1.0");

        assert!(db.calendar_by_id("no-such-id").unwrap().is_none());
    }

    #[test]
    fn next_free_color_advances_per_calendar() {
        let mut db = CalendarDb::open_in_memory().unwrap();

        let first = db.create_calendar(&NewCalendar::imported("One")).unwrap();
        let second = db.create_calendar(&NewCalendar::imported("Two")).unwrap();

        let first = db.calendar_by_id(&first).unwrap().unwrap();
        let second = db.calendar_by_id(&second).unwrap().unwrap();
        assert_eq!(first.color, "blue");
        assert_eq!(second.color, "green");
    }

    #[test]
    fn event_round_trips() {
        let mut db = CalendarDb::open_in_memory().unwrap();
        let calendar_id = db.create_calendar(&NewCalendar::imported("Work")).unwrap();

        let event = new_event("Standup");
        let id = db.create_event(&calendar_id, &event).unwrap();

        let stored = db.event_by_id(&id).unwrap().unwrap();
        assert_eq!(stored.title, "Standup");
        assert_eq!(stored.description, "daily sync");
        assert_eq!(stored.location, "");
        assert_eq!(stored.start, event.start);
        assert_eq!(stored.end, event.end);
    }

    #[test]
    fn event_in_unknown_calendar_is_a_create_error() {
        let mut db = CalendarDb::open_in_memory().unwrap();

        let result = db.create_event("no-such-calendar", &new_event("Standup"));
        assert!(matches!(result, Err(SyncError::Create(_))));
    }
}
