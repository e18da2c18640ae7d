//! Test doubles for the remote service and the local calendar store.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::context::SyncContext;
use crate::error::{SyncError, SyncResult};
use crate::local::{LocalCalendar, LocalEvent, LocalStore, NewCalendar, NewEvent};
use crate::remote::{RemoteCalendar, RemoteEvent, RemoteService, RemoteSession};
use crate::store::MappingStore;

pub fn test_context() -> SyncContext {
    let store = MappingStore::open_in_memory().unwrap();
    let snapshot = store.load_all().unwrap();
    SyncContext::new(store, snapshot)
}

pub fn t(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, hour, 0, 0).unwrap()
}

pub fn remote_calendar(id: &str, title: &str) -> RemoteCalendar {
    RemoteCalendar {
        id: id.to_string(),
        title: title.to_string(),
        summary: String::new(),
    }
}

pub fn remote_event(id: &str, title: &str) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
        uid: format!("{id}@remote"),
        title: title.to_string(),
        description: None,
        start: t(9),
        end: t(10),
    }
}

/// Scripted remote service: fixed calendar and event lists, shared by
/// every account that logs in.
#[derive(Default)]
pub struct MockRemote {
    pub calendars: Vec<RemoteCalendar>,
    /// Remote calendar id → its events.
    pub events: HashMap<String, Vec<RemoteEvent>>,
    /// Username whose login is rejected.
    pub reject_user: Option<String>,
    /// Fail every calendar-listing call after login.
    pub fail_calendars: bool,
    /// Remote calendar id whose event listing fails.
    pub fail_events_for: Option<String>,
    /// Number of login attempts, including rejected ones.
    pub logins: Cell<usize>,
}

impl MockRemote {
    pub fn with_calendar(calendar: RemoteCalendar, events: Vec<RemoteEvent>) -> Self {
        let mut remote = MockRemote::default();
        remote.add_calendar(calendar, events);
        remote
    }

    pub fn add_calendar(&mut self, calendar: RemoteCalendar, events: Vec<RemoteEvent>) {
        self.events.insert(calendar.id.clone(), events);
        self.calendars.push(calendar);
    }
}

pub struct MockSession {
    calendars: Vec<RemoteCalendar>,
    events: HashMap<String, Vec<RemoteEvent>>,
    fail_calendars: bool,
    fail_events_for: Option<String>,
}

impl RemoteService for MockRemote {
    type Session = MockSession;

    async fn login(&self, username: &str, _secret: &str) -> SyncResult<MockSession> {
        self.logins.set(self.logins.get() + 1);
        if self.reject_user.as_deref() == Some(username) {
            return Err(SyncError::Auth(format!("invalid credentials for {username}")));
        }
        Ok(MockSession {
            calendars: self.calendars.clone(),
            events: self.events.clone(),
            fail_calendars: self.fail_calendars,
            fail_events_for: self.fail_events_for.clone(),
        })
    }
}

impl RemoteSession for MockSession {
    async fn calendars(&self) -> SyncResult<Vec<RemoteCalendar>> {
        if self.fail_calendars {
            return Err(SyncError::Transport("calendar listing unavailable".to_string()));
        }
        Ok(self.calendars.clone())
    }

    async fn events(&self, calendar_id: &str) -> SyncResult<Vec<RemoteEvent>> {
        if self.fail_events_for.as_deref() == Some(calendar_id) {
            return Err(SyncError::Transport(format!(
                "event listing unavailable for {calendar_id}"
            )));
        }
        Ok(self.events.get(calendar_id).cloned().unwrap_or_default())
    }
}

/// In-memory local calendar store with sequential generated ids
/// (L1, E2, ...).
#[derive(Default)]
pub struct MemoryStore {
    pub calendars: HashMap<String, LocalCalendar>,
    pub events: HashMap<String, LocalEvent>,
    pub fail_creates: bool,
    /// Return an empty id from creates instead of a generated one.
    pub empty_ids: bool,
    next_id: usize,
}

impl MemoryStore {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

impl LocalStore for MemoryStore {
    fn create_calendar(&mut self, attrs: &NewCalendar) -> SyncResult<String> {
        if self.fail_creates {
            return Err(SyncError::Create("store rejected the calendar".to_string()));
        }
        if self.empty_ids {
            return Ok(String::new());
        }
        let id = self.next_id("L");
        self.calendars.insert(
            id.clone(),
            LocalCalendar {
                id: id.clone(),
                title: attrs.title.clone(),
                color: "blue".to_string(),
                visible: attrs.visible,
                sync_enabled: attrs.sync_enabled,
                source_tag: attrs.source_tag.clone(),
                source_version: attrs.source_version.clone(),
            },
        );
        Ok(id)
    }

    fn calendar_by_id(&self, id: &str) -> SyncResult<Option<LocalCalendar>> {
        Ok(self.calendars.get(id).cloned())
    }

    fn create_event(&mut self, calendar_id: &str, attrs: &NewEvent) -> SyncResult<String> {
        if self.fail_creates {
            return Err(SyncError::Create("store rejected the event".to_string()));
        }
        if !self.calendars.contains_key(calendar_id) {
            return Err(SyncError::Create(format!("no such calendar: {calendar_id}")));
        }
        if self.empty_ids {
            return Ok(String::new());
        }
        let id = self.next_id("E");
        self.events.insert(
            id.clone(),
            LocalEvent {
                id: id.clone(),
                title: attrs.title.clone(),
                description: attrs.description.clone(),
                location: attrs.location.clone(),
                start: attrs.start,
                end: attrs.end,
            },
        );
        Ok(id)
    }

    fn event_by_id(&self, id: &str) -> SyncResult<Option<LocalEvent>> {
        Ok(self.events.get(id).cloned())
    }
}
