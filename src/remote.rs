//! HTTP client for the remote calendar service.
//!
//! Speaks a JSON API with enveloped responses:
//! `{"status": "success", "data": …}` or
//! `{"status": "error", "error": …}`.
//!
//! Endpoints:
//! - `POST /sessions` with `{username, secret}` → `{token}`
//! - `GET /calendars` (Bearer token)
//! - `GET /calendars/{id}/events`

use gcalsync_core::error::{SyncError, SyncResult};
use gcalsync_core::remote::{RemoteCalendar, RemoteEvent, RemoteService, RemoteSession};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

/// Response envelope used by the calendar API.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ApiResponse<T> {
    Success { data: T },
    Error { error: String },
}

pub struct GcalClient {
    http: reqwest::Client,
    base: Url,
}

impl GcalClient {
    pub fn new(server_url: &str) -> SyncResult<Self> {
        let base = Url::parse(server_url)
            .map_err(|e| SyncError::Transport(format!("invalid server url {server_url}: {e}")))?;

        Ok(GcalClient {
            http: reqwest::Client::new(),
            base,
        })
    }
}

// Each segment is appended as-is, so a calendar id containing `/`
// ends up percent-encoded instead of splitting the path.
fn endpoint(base: &Url, segments: &[&str]) -> SyncResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::Transport("server url cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl RemoteService for GcalClient {
    type Session = GcalSession;

    async fn login(&self, username: &str, secret: &str) -> SyncResult<GcalSession> {
        let url =
            endpoint(&self.base, &["sessions"]).map_err(|e| SyncError::Auth(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(&LoginRequest { username, secret })
            .send()
            .await
            .map_err(|e| SyncError::Auth(e.to_string()))?;

        let envelope: ApiResponse<LoginData> = response
            .json()
            .await
            .map_err(|e| SyncError::Auth(e.to_string()))?;

        match envelope {
            ApiResponse::Success { data } => Ok(GcalSession {
                http: self.http.clone(),
                base: self.base.clone(),
                token: data.token,
            }),
            ApiResponse::Error { error } => Err(SyncError::Auth(error)),
        }
    }
}

pub struct GcalSession {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl GcalSession {
    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> SyncResult<T> {
        let url = endpoint(&self.base, segments)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        match envelope {
            ApiResponse::Success { data } => Ok(data),
            ApiResponse::Error { error } => Err(SyncError::Transport(error)),
        }
    }
}

impl RemoteSession for GcalSession {
    async fn calendars(&self) -> SyncResult<Vec<RemoteCalendar>> {
        self.get(&["calendars"]).await
    }

    async fn events(&self, calendar_id: &str) -> SyncResult<Vec<RemoteEvent>> {
        self.get(&["calendars", calendar_id, "events"]).await
    }
}
