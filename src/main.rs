mod config;
mod local_db;
mod remote;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gcalsync_core::account::AccountRegistry;
use gcalsync_core::context::SyncContext;
use gcalsync_core::store::MappingStore;
use gcalsync_core::sync;

use crate::config::GcalsyncConfig;
use crate::local_db::CalendarDb;
use crate::remote::GcalClient;

#[derive(Parser)]
#[command(name = "gcalsync")]
#[command(about = "One-way import of remote calendars and events into the local calendar store")]
struct Cli {
    /// Account username, stored on first use if no accounts exist yet
    #[arg(requires = "secret")]
    username: Option<String>,

    /// Account secret, stored alongside the username
    secret: Option<String>,

    /// Mapping database path (default: platform data dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Local calendar database path (default: platform data dir)
    #[arg(long)]
    calendar_db: Option<PathBuf>,

    /// Remote service base URL
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = GcalsyncConfig::load()?;

    let mapping_db = match cli.db {
        Some(path) => path,
        None => cfg.mapping_db()?,
    };
    let calendar_db = match cli.calendar_db {
        Some(path) => path,
        None => cfg.calendar_db()?,
    };
    let server_url = cli.server.unwrap_or_else(|| cfg.server_url());

    // Mapping-store failures are fatal: without the ledger every run
    // would re-import everything.
    let store = MappingStore::open(&mapping_db)
        .with_context(|| format!("could not open mapping store at {}", mapping_db.display()))?;
    let mut snapshot = store.load_all().context("could not load mapping tables")?;

    let accounts = std::mem::take(&mut snapshot.accounts);
    let mut registry = AccountRegistry::new(accounts);
    let mut ctx = SyncContext::new(store, snapshot);

    // Command-line credentials are only consulted when no accounts are
    // stored yet.
    if registry.is_empty() {
        match (&cli.username, &cli.secret) {
            (Some(username), Some(secret)) => {
                registry
                    .add(ctx.store(), username, secret)
                    .context("could not store the new account")?;
                println!("Stored account {username}");
            }
            _ => {
                println!("No accounts stored and none provided on the command line.");
                println!("Run `gcalsync <USERNAME> <SECRET>` to add one.");
                return Ok(());
            }
        }
    }

    let remote = GcalClient::new(&server_url)?;
    let mut local = CalendarDb::open(&calendar_db).with_context(|| {
        format!("could not open calendar store at {}", calendar_db.display())
    })?;

    let report = sync::run(&mut ctx, &registry, &remote, &mut local).await;
    render::print_report(&report);

    Ok(())
}
