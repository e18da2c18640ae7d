//! Durable mapping store backed by SQLite.
//!
//! An append-only ledger of remote→local identifier correspondences,
//! plus stored account credentials and per-calendar sync flags.
//! Mapping rows are inserted one at a time and never updated or
//! deleted during normal operation.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection};

use crate::account::Account;
use crate::error::{SyncError, SyncResult};

/// Everything the store holds, loaded once at startup.
#[derive(Debug, Default)]
pub struct MappingSnapshot {
    /// Remote calendar id → local calendar id.
    pub calendar_mappings: HashMap<String, String>,
    /// Remote event id → local event id.
    pub event_mappings: HashMap<String, String>,
    /// Stored accounts, in insertion order.
    pub accounts: Vec<Account>,
    /// Remote calendar id → sync-eligibility flag.
    pub sync_flags: HashMap<String, bool>,
}

/// SQLite database holding the mapping tables.
pub struct MappingStore {
    conn: Connection,
}

impl MappingStore {
    /// Open the mapping database and initialize the schema.
    ///
    /// Schema failure here is fatal for the run: without the ledger
    /// every run would re-import everything.
    pub fn open(path: &Path) -> SyncResult<Self> {
        let conn =
            Connection::open(path).map_err(|e| SyncError::StorageInit(e.to_string()))?;
        let store = MappingStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory mapping store (for tests).
    pub fn open_in_memory() -> SyncResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| SyncError::StorageInit(e.to_string()))?;
        let store = MappingStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SyncResult<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS calendar_mapping (
                    remote_id TEXT NOT NULL,
                    local_id  TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS event_mapping (
                    remote_id TEXT NOT NULL,
                    local_id  TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS google_calendars (
                    remote_id TEXT NOT NULL,
                    forsync   INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS google_accounts (
                    username TEXT NOT NULL,
                    secret   TEXT NOT NULL
                );",
            )
            .map_err(|e| SyncError::StorageInit(e.to_string()))
    }

    /// Load all four tables into memory.
    pub fn load_all(&self) -> SyncResult<MappingSnapshot> {
        let mut snapshot = MappingSnapshot {
            calendar_mappings: self
                .load_pairs("SELECT remote_id, local_id FROM calendar_mapping")?,
            event_mappings: self.load_pairs("SELECT remote_id, local_id FROM event_mapping")?,
            ..MappingSnapshot::default()
        };

        let mut stmt = self
            .conn
            .prepare("SELECT remote_id, forsync FROM google_calendars")?;
        let flags = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;
        for flag in flags {
            let (remote_id, forsync) = flag?;
            snapshot.sync_flags.insert(remote_id, forsync);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT username, secret FROM google_accounts")?;
        let accounts = stmt.query_map([], |row| {
            Ok(Account {
                username: row.get(0)?,
                secret: row.get(1)?,
            })
        })?;
        for account in accounts {
            snapshot.accounts.push(account?);
        }

        Ok(snapshot)
    }

    fn load_pairs(&self, sql: &str) -> SyncResult<HashMap<String, String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut map: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (remote_id, local_id) = row?;
            map.insert(remote_id, local_id);
        }
        Ok(map)
    }

    pub fn put_calendar_mapping(&self, remote_id: &str, local_id: &str) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO calendar_mapping (remote_id, local_id) VALUES (?1, ?2)",
            params![remote_id, local_id],
        )?;
        Ok(())
    }

    pub fn put_event_mapping(&self, remote_id: &str, local_id: &str) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO event_mapping (remote_id, local_id) VALUES (?1, ?2)",
            params![remote_id, local_id],
        )?;
        Ok(())
    }

    pub fn put_account(&self, username: &str, secret: &str) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO google_accounts (username, secret) VALUES (?1, ?2)",
            params![username, secret],
        )?;
        Ok(())
    }

    pub fn put_sync_flag(&self, remote_id: &str, enabled: bool) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO google_calendars (remote_id, forsync) VALUES (?1, ?2)",
            params![remote_id, enabled],
        )?;
        Ok(())
    }
}
