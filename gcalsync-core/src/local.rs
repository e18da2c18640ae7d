//! Local calendar store data model and collaborator trait.

use chrono::{DateTime, Utc};

use crate::error::SyncResult;

/// Source tag stamped on every calendar created by the importer.
pub const SYNC_SOURCE_TAG: &str = "remote-sync";
/// Source version stamped alongside [`SYNC_SOURCE_TAG`].
pub const SYNC_SOURCE_VERSION: &str = "1.0";

/// How the store should pick a color for a new calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Let the store assign the next unused calendar color.
    NextFree,
}

/// Attributes for creating a local calendar.
#[derive(Debug, Clone)]
pub struct NewCalendar {
    pub title: String,
    pub color: ColorPolicy,
    pub visible: bool,
    pub sync_enabled: bool,
    pub source_tag: String,
    pub source_version: String,
}

impl NewCalendar {
    /// Attributes used for every calendar imported from the remote
    /// service.
    pub fn imported(title: &str) -> Self {
        NewCalendar {
            title: title.to_string(),
            color: ColorPolicy::NextFree,
            visible: false,
            sync_enabled: true,
            source_tag: SYNC_SOURCE_TAG.to_string(),
            source_version: SYNC_SOURCE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalCalendar {
    pub id: String,
    pub title: String,
    pub color: String,
    pub visible: bool,
    pub sync_enabled: bool,
    pub source_tag: String,
    pub source_version: String,
}

/// Attributes for creating a local event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LocalEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Destination calendar store. The engine only ever creates entities
/// through this trait, never updates or deletes them.
pub trait LocalStore {
    /// Create a calendar and return its generated id.
    fn create_calendar(&mut self, attrs: &NewCalendar) -> SyncResult<String>;

    fn calendar_by_id(&self, id: &str) -> SyncResult<Option<LocalCalendar>>;

    /// Create an event in a calendar and return its generated id.
    fn create_event(&mut self, calendar_id: &str, attrs: &NewEvent) -> SyncResult<String>;

    fn event_by_id(&self, id: &str) -> SyncResult<Option<LocalEvent>>;
}
