//! Remote calendar service data model and collaborator traits.
//!
//! The remote service is consumed, never implemented, by the engine:
//! callers supply an implementation (an HTTP client in the binary, a
//! scripted double in tests). Entities are read into owned value
//! structs at this boundary and are read-only downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

/// A calendar as listed by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCalendar {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

/// An event as listed by the remote service. `start`/`end` are the
/// event's primary time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    /// Provider UID, distinct from the entry id. Carried for
    /// diagnostics only.
    pub uid: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Entry point to the remote service: exchanges account credentials
/// for an authenticated session.
#[allow(async_fn_in_trait)]
pub trait RemoteService {
    type Session: RemoteSession;

    /// Authenticate one account. Transport failures during login count
    /// as authentication failures as far as the run is concerned.
    async fn login(&self, username: &str, secret: &str) -> SyncResult<Self::Session>;
}

/// An authenticated session for one account.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    async fn calendars(&self) -> SyncResult<Vec<RemoteCalendar>>;
    async fn events(&self, calendar_id: &str) -> SyncResult<Vec<RemoteEvent>>;
}
