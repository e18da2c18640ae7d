//! Sequential sync traversal: accounts → calendars → events.
//!
//! Accounts are processed in registry order, calendars in remote-list
//! order, events in remote-list order, with no parallelism. Failures
//! scoped to one account, calendar or event are recorded in the report
//! and never abort sibling work.

use crate::account::AccountRegistry;
use crate::context::SyncContext;
use crate::local::LocalStore;
use crate::reconcile::{self, CalendarOutcome, EventOutcome};
use crate::remote::{RemoteCalendar, RemoteService, RemoteSession};

/// Outcome of a whole run, one entry per account in registry order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub accounts: Vec<AccountReport>,
}

#[derive(Debug)]
pub struct AccountReport {
    pub username: String,
    /// Login or calendar-listing failure; the account was skipped.
    pub error: Option<String>,
    pub calendars: Vec<CalendarReport>,
}

#[derive(Debug)]
pub struct CalendarReport {
    pub remote_id: String,
    pub title: String,
    pub outcome: CalendarOutcome,
    /// Event-listing failure; the calendar's events were skipped.
    pub events_error: Option<String>,
    pub events: Vec<EventReport>,
}

#[derive(Debug)]
pub struct EventReport {
    pub remote_id: String,
    pub title: String,
    pub outcome: EventOutcome,
}

/// Aggregate event counters for rendering and assertions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventTotals {
    pub created: usize,
    pub unchanged: usize,
    pub drifted: usize,
    pub dangling: usize,
    pub failed: usize,
}

impl RunReport {
    /// Calendars created locally this run (mapped or not).
    pub fn calendars_created(&self) -> usize {
        self.calendar_reports()
            .filter(|c| {
                matches!(
                    c.outcome,
                    CalendarOutcome::Created { .. } | CalendarOutcome::CreatedUnmapped { .. }
                )
            })
            .count()
    }

    pub fn event_totals(&self) -> EventTotals {
        let mut totals = EventTotals::default();
        for event in self.calendar_reports().flat_map(|c| &c.events) {
            match &event.outcome {
                EventOutcome::Created { .. } | EventOutcome::CreatedUnmapped { .. } => {
                    totals.created += 1
                }
                EventOutcome::Unchanged => totals.unchanged += 1,
                EventOutcome::Drifted { .. } => totals.drifted += 1,
                EventOutcome::Dangling { .. } => totals.dangling += 1,
                EventOutcome::CreateFailed { .. } => totals.failed += 1,
            }
        }
        totals
    }

    fn calendar_reports(&self) -> impl Iterator<Item = &CalendarReport> {
        self.accounts.iter().flat_map(|a| &a.calendars)
    }
}

/// Run the full traversal for every account in the registry.
///
/// An empty registry yields an empty report without a single remote
/// call.
pub async fn run<R, L>(
    ctx: &mut SyncContext,
    registry: &AccountRegistry,
    remote: &R,
    local: &mut L,
) -> RunReport
where
    R: RemoteService,
    L: LocalStore,
{
    let mut report = RunReport::default();
    for account in registry.iter() {
        let account_report =
            sync_account(ctx, remote, local, &account.username, &account.secret).await;
        report.accounts.push(account_report);
    }
    report
}

/// Sync every calendar of one account. Login and calendar-listing
/// failures skip the account.
pub async fn sync_account<R, L>(
    ctx: &mut SyncContext,
    remote: &R,
    local: &mut L,
    username: &str,
    secret: &str,
) -> AccountReport
where
    R: RemoteService,
    L: LocalStore,
{
    let mut report = AccountReport {
        username: username.to_string(),
        error: None,
        calendars: Vec::new(),
    };

    let session = match remote.login(username, secret).await {
        Ok(session) => session,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    let calendars = match session.calendars().await {
        Ok(calendars) => calendars,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    for calendar in &calendars {
        report
            .calendars
            .push(sync_calendar(ctx, &session, local, calendar).await);
    }

    report
}

async fn sync_calendar<S, L>(
    ctx: &mut SyncContext,
    session: &S,
    local: &mut L,
    calendar: &RemoteCalendar,
) -> CalendarReport
where
    S: RemoteSession,
    L: LocalStore,
{
    let outcome = reconcile::reconcile_calendar(ctx, local, calendar);
    let mut report = CalendarReport {
        remote_id: calendar.id.clone(),
        title: calendar.title.clone(),
        outcome,
        events_error: None,
        events: Vec::new(),
    };

    // Dangling mappings and failed creates skip event processing.
    let local_id = match report.outcome.local_id() {
        Some(id) => id.to_string(),
        None => return report,
    };

    let events = match session.events(&calendar.id).await {
        Ok(events) => events,
        Err(e) => {
            report.events_error = Some(e.to_string());
            return report;
        }
    };

    for event in &events {
        let outcome = reconcile::reconcile_event(ctx, local, &local_id, event);
        report.events.push(EventReport {
            remote_id: event.id.clone(),
            title: event.title.clone(),
            outcome,
        });
    }

    report
}
