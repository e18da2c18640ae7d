//! Per-run sync context owning the mapping-store snapshot.

use crate::error::SyncResult;
use crate::store::{MappingSnapshot, MappingStore};

/// Constructed once per run and passed by reference into the
/// orchestrator and reconcilers. Mapping inserts go through here so
/// the durable tables and the in-memory view never diverge within a
/// run.
pub struct SyncContext {
    store: MappingStore,
    snapshot: MappingSnapshot,
}

impl SyncContext {
    pub fn new(store: MappingStore, snapshot: MappingSnapshot) -> Self {
        SyncContext { store, snapshot }
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Local calendar id a remote calendar was previously imported as.
    pub fn local_calendar_id(&self, remote_id: &str) -> Option<&str> {
        self.snapshot
            .calendar_mappings
            .get(remote_id)
            .map(String::as_str)
    }

    /// Local event id a remote event was previously imported as.
    pub fn local_event_id(&self, remote_id: &str) -> Option<&str> {
        self.snapshot
            .event_mappings
            .get(remote_id)
            .map(String::as_str)
    }

    /// Persist a calendar mapping, then mirror it in memory.
    pub fn record_calendar_mapping(&mut self, remote_id: &str, local_id: &str) -> SyncResult<()> {
        self.store.put_calendar_mapping(remote_id, local_id)?;
        self.snapshot
            .calendar_mappings
            .insert(remote_id.to_string(), local_id.to_string());
        Ok(())
    }

    /// Persist an event mapping, then mirror it in memory.
    pub fn record_event_mapping(&mut self, remote_id: &str, local_id: &str) -> SyncResult<()> {
        self.store.put_event_mapping(remote_id, local_id)?;
        self.snapshot
            .event_mappings
            .insert(remote_id.to_string(), local_id.to_string());
        Ok(())
    }

    /// Record a calendar's sync-eligibility flag. Written when a
    /// calendar is first imported; the traversal never consults it.
    pub fn record_sync_flag(&mut self, remote_id: &str, enabled: bool) -> SyncResult<()> {
        self.store.put_sync_flag(remote_id, enabled)?;
        self.snapshot
            .sync_flags
            .insert(remote_id.to_string(), enabled);
        Ok(())
    }

    pub fn sync_flag(&self, remote_id: &str) -> Option<bool> {
        self.snapshot.sync_flags.get(remote_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SyncContext {
        let store = MappingStore::open_in_memory().unwrap();
        let snapshot = store.load_all().unwrap();
        SyncContext::new(store, snapshot)
    }

    #[test]
    fn recorded_mappings_are_durable_and_visible() {
        let mut ctx = context();
        ctx.record_calendar_mapping("cal1", "L1").unwrap();
        ctx.record_event_mapping("ev1", "E1").unwrap();

        assert_eq!(ctx.local_calendar_id("cal1"), Some("L1"));
        assert_eq!(ctx.local_event_id("ev1"), Some("E1"));

        let reloaded = ctx.store().load_all().unwrap();
        assert_eq!(reloaded.calendar_mappings.get("cal1").unwrap(), "L1");
        assert_eq!(reloaded.event_mappings.get("ev1").unwrap(), "E1");
    }

    #[test]
    fn sync_flags_round_trip() {
        let mut ctx = context();
        assert_eq!(ctx.sync_flag("cal1"), None);

        ctx.record_sync_flag("cal1", true).unwrap();
        assert_eq!(ctx.sync_flag("cal1"), Some(true));
    }
}
