// Application state for HTTP handlers
use crate::application::export_service::ExportService;
use crate::application::page_service::PageService;
use crate::application::record_service::RecordService;
use crate::application::refresh::RequestSequencer;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

type RefreshKey = (String, &'static str);

/// One sequencer per (client, page), kept only while a refresh for that
/// pair is in flight.
#[derive(Default)]
pub struct Refreshes {
    sequencers: Mutex<HashMap<RefreshKey, Arc<RequestSequencer>>>,
}

impl Refreshes {
    fn map(&self) -> MutexGuard<'_, HashMap<RefreshKey, Arc<RequestSequencer>>> {
        self.sequencers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Share the sequencer of `client` on `page` for the length of one
    /// request. Overlapping requests get the same sequencer.
    pub fn lease(&self, client: &str, page: &'static str) -> RefreshLease<'_> {
        let key = (client.to_string(), page);
        let sequencer = self.map().entry(key.clone()).or_default().clone();
        RefreshLease {
            refreshes: self,
            key,
            sequencer,
        }
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.map().len()
    }
}

/// Drops the map entry with the last in-flight request, so idle clients
/// hold no memory.
pub struct RefreshLease<'a> {
    refreshes: &'a Refreshes,
    key: RefreshKey,
    sequencer: Arc<RequestSequencer>,
}

impl Deref for RefreshLease<'_> {
    type Target = RequestSequencer;

    fn deref(&self) -> &RequestSequencer {
        &self.sequencer
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        let mut map = self.refreshes.map();
        // New leases are only handed out under this lock, so a count of two
        // (the map and this lease) means nobody else holds the sequencer.
        let idle = map
            .get(&self.key)
            .is_some_and(|s| Arc::ptr_eq(s, &self.sequencer) && Arc::strong_count(s) == 2);
        if idle {
            map.remove(&self.key);
        }
    }
}

pub struct AppState {
    pub page_service: PageService,
    pub record_service: RecordService,
    pub export_service: ExportService,
    pub refreshes: Refreshes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_is_shared_per_client_and_page() {
        let refreshes = Refreshes::default();
        let a = refreshes.lease("tab-1", "families");
        let b = refreshes.lease("tab-1", "families");
        let other = refreshes.lease("tab-2", "families");
        let reports = refreshes.lease("tab-1", "reports");

        let ticket = a.begin();
        b.begin();
        assert!(!a.is_current(ticket));
        assert!(other.is_current(other.begin()));
        assert!(reports.is_current(reports.begin()));
        assert_eq!(refreshes.tracked(), 3);
    }

    #[test]
    fn test_entry_lives_until_last_lease_drops() {
        let refreshes = Refreshes::default();
        let first = refreshes.lease("tab-1", "families");
        let second = refreshes.lease("tab-1", "families");

        drop(first);
        assert_eq!(refreshes.tracked(), 1);
        drop(second);
        assert_eq!(refreshes.tracked(), 0);
    }

    #[test]
    fn test_one_shot_clients_leave_nothing_behind() {
        let refreshes = Refreshes::default();
        for n in 0..10_000 {
            let lease = refreshes.lease(&format!("client-{n}"), "students");
            lease.begin();
        }
        assert_eq!(refreshes.tracked(), 0);
    }
}
