//! Terminal rendering for the run report.

use gcalsync_core::reconcile::{CalendarOutcome, EventOutcome};
use gcalsync_core::sync::{AccountReport, CalendarReport, RunReport};
use owo_colors::OwoColorize;

pub fn print_report(report: &RunReport) {
    for (i, account) in report.accounts.iter().enumerate() {
        print_account(account);

        if i < report.accounts.len() - 1 {
            println!();
        }
    }

    let totals = report.event_totals();
    println!(
        "\nTotal: {} calendars created, {} events created, {} unchanged",
        report.calendars_created(),
        totals.created,
        totals.unchanged
    );

    if totals.drifted > 0 || totals.dangling > 0 || totals.failed > 0 {
        println!(
            "{}",
            format!(
                "Warnings: {} drifted, {} dangling, {} failed",
                totals.drifted, totals.dangling, totals.failed
            )
            .yellow()
        );
    }
}

fn print_account(account: &AccountReport) {
    println!("📅 {}", account.username);

    if let Some(error) = &account.error {
        println!("   {}", format!("skipped: {error}").red());
        return;
    }

    if account.calendars.is_empty() {
        println!("   no calendars returned");
        return;
    }

    for calendar in &account.calendars {
        print_calendar(calendar);
    }
}

fn print_calendar(calendar: &CalendarReport) {
    match &calendar.outcome {
        CalendarOutcome::Created { flag_error, .. } => {
            println!("   + {}", calendar.title);
            if let Some(error) = flag_error {
                println!("     {}", format!("sync flag not saved: {error}").yellow());
            }
        }
        CalendarOutcome::Reused { .. } => println!("   = {}", calendar.title),
        CalendarOutcome::CreatedUnmapped { error, .. } => {
            println!("   + {}", calendar.title);
            println!(
                "     {}",
                format!("mapping not saved: {error} (may re-import next run)").yellow()
            );
        }
        CalendarOutcome::Dangling { local_id } => {
            println!("   ! {}", calendar.title.red());
            println!(
                "     {}",
                format!("mapped to missing local calendar {local_id}; events skipped").red()
            );
            return;
        }
        CalendarOutcome::CreateFailed { error } => {
            println!("   x {}", calendar.title.red());
            println!("     {}", format!("create failed: {error}").red());
            return;
        }
    }

    if let Some(error) = &calendar.events_error {
        println!("     {}", format!("could not list events: {error}").red());
        return;
    }

    for event in &calendar.events {
        match &event.outcome {
            EventOutcome::Created { .. } => println!("     + {}", event.title),
            EventOutcome::Unchanged => {}
            EventOutcome::CreatedUnmapped { error, .. } => {
                println!("     + {}", event.title);
                println!("       {}", format!("mapping not saved: {error}").yellow());
            }
            EventOutcome::Drifted {
                local_title,
                remote_title,
            } => {
                println!(
                    "     {}",
                    format!("~ title drift: remote \"{remote_title}\" vs local \"{local_title}\"")
                        .yellow()
                );
            }
            EventOutcome::Dangling { local_id } => {
                println!(
                    "     {}",
                    format!("! {} mapped to missing local event {local_id}", event.title).red()
                );
            }
            EventOutcome::CreateFailed { error } => {
                println!("     {}", format!("x {}: {error}", event.title).red());
            }
        }
    }
}
