//! Create-vs-reuse decisions for one remote entity.
//!
//! A mapping row is written only after the corresponding local create
//! succeeded with a non-empty id, so a failed create can never leave a
//! mapping behind. Already-mapped entities are never mutated: the
//! reconcilers only resolve them and report drift or dangling
//! mappings. Neither state is ever repaired.

use crate::context::SyncContext;
use crate::local::{LocalStore, NewCalendar, NewEvent};
use crate::remote::{RemoteCalendar, RemoteEvent};

/// What happened to one remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarOutcome {
    /// Already imported; the mapped local calendar resolved.
    Reused { local_id: String },
    /// Newly created and mapped. `flag_error` is set when the
    /// sync-eligibility flag could not be recorded; the import itself
    /// stands.
    Created {
        local_id: String,
        flag_error: Option<String>,
    },
    /// Created locally, but the mapping row could not be written. The
    /// calendar is usable this run; the next run may import a
    /// duplicate.
    CreatedUnmapped { local_id: String, error: String },
    /// Mapping exists but the local calendar could not be resolved.
    /// The calendar's events are skipped.
    Dangling { local_id: String },
    /// Local create failed; nothing was written.
    CreateFailed { error: String },
}

impl CalendarOutcome {
    /// The resolved local calendar id, when events should be
    /// processed for this calendar.
    pub fn local_id(&self) -> Option<&str> {
        match self {
            CalendarOutcome::Reused { local_id }
            | CalendarOutcome::Created { local_id, .. }
            | CalendarOutcome::CreatedUnmapped { local_id, .. } => Some(local_id),
            CalendarOutcome::Dangling { .. } | CalendarOutcome::CreateFailed { .. } => None,
        }
    }
}

/// What happened to one remote event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Newly created and mapped.
    Created { local_id: String },
    /// Created locally, but the mapping row could not be written.
    CreatedUnmapped { local_id: String, error: String },
    /// Mapped, resolved, titles match.
    Unchanged,
    /// Mapped and resolved, but the titles no longer match.
    /// Report-only: neither side is modified.
    Drifted {
        local_title: String,
        remote_title: String,
    },
    /// Mapping exists but the local event could not be resolved.
    Dangling { local_id: String },
    /// Local create failed; no mapping was written.
    CreateFailed { error: String },
}

/// Resolve one remote calendar against the mapping table, creating
/// the local calendar if it has never been imported.
pub fn reconcile_calendar<L: LocalStore>(
    ctx: &mut SyncContext,
    local: &mut L,
    remote: &RemoteCalendar,
) -> CalendarOutcome {
    if let Some(local_id) = ctx.local_calendar_id(&remote.id) {
        let local_id = local_id.to_string();
        return match local.calendar_by_id(&local_id) {
            Ok(Some(_)) => CalendarOutcome::Reused { local_id },
            // A lookup error counts as unresolved; no repair either way.
            Ok(None) | Err(_) => CalendarOutcome::Dangling { local_id },
        };
    }

    let attrs = NewCalendar::imported(&remote.title);
    let local_id = match local.create_calendar(&attrs) {
        Ok(id) if !id.is_empty() => id,
        Ok(_) => {
            return CalendarOutcome::CreateFailed {
                error: "store returned an empty calendar id".to_string(),
            }
        }
        Err(e) => {
            return CalendarOutcome::CreateFailed {
                error: e.to_string(),
            }
        }
    };

    if let Err(e) = ctx.record_calendar_mapping(&remote.id, &local_id) {
        return CalendarOutcome::CreatedUnmapped {
            local_id,
            error: e.to_string(),
        };
    }

    // forsync is bookkeeping only; a failed flag write does not undo
    // the import, but it is carried on the outcome.
    let flag_error = ctx
        .record_sync_flag(&remote.id, true)
        .err()
        .map(|e| e.to_string());

    CalendarOutcome::Created {
        local_id,
        flag_error,
    }
}

/// Resolve one remote event within an already-resolved local
/// calendar, creating the local event if it has never been imported.
pub fn reconcile_event<L: LocalStore>(
    ctx: &mut SyncContext,
    local: &mut L,
    calendar_id: &str,
    remote: &RemoteEvent,
) -> EventOutcome {
    if let Some(local_id) = ctx.local_event_id(&remote.id) {
        let local_id = local_id.to_string();
        return match local.event_by_id(&local_id) {
            Ok(Some(event)) => {
                if event.title == remote.title {
                    EventOutcome::Unchanged
                } else {
                    EventOutcome::Drifted {
                        local_title: event.title,
                        remote_title: remote.title.clone(),
                    }
                }
            }
            Ok(None) | Err(_) => EventOutcome::Dangling { local_id },
        };
    }

    let attrs = NewEvent {
        title: remote.title.clone(),
        description: remote.description.clone().unwrap_or_default(),
        location: String::new(),
        start: remote.start,
        end: remote.end,
    };

    let local_id = match local.create_event(calendar_id, &attrs) {
        Ok(id) if !id.is_empty() => id,
        Ok(_) => {
            return EventOutcome::CreateFailed {
                error: "store returned an empty event id".to_string(),
            }
        }
        Err(e) => {
            return EventOutcome::CreateFailed {
                error: e.to_string(),
            }
        }
    };

    match ctx.record_event_mapping(&remote.id, &local_id) {
        Ok(()) => EventOutcome::Created { local_id },
        Err(e) => EventOutcome::CreatedUnmapped {
            local_id,
            error: e.to_string(),
        },
    }
}
