//! CHF UE Context and Pool
//!
//! One `ChfUe` per SUPI, held in a sharded concurrent map. Creation goes
//! through the map's entry API so the existence check and the insert happen
//! under the same shard lock.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{ChfError, ChfResult};

/// SUPI prefix of IMSI-based subscriber identities
pub const SUPI_IMSI_PREFIX: &str = "imsi-";

/// Charging state attached to a UE by the converged-charging handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChfUeState {
    /// Notification URI given by the NF consumer
    pub notify_uri: Option<String>,
    /// Keys of the charging records opened for this UE
    pub record_keys: BTreeSet<String>,
}

/// CHF UE context
#[derive(Debug)]
pub struct ChfUe {
    supi: String,
    state: RwLock<ChfUeState>,
}

impl ChfUe {
    fn new(supi: &str) -> Self {
        Self {
            supi: supi.to_string(),
            state: RwLock::new(ChfUeState::default()),
        }
    }

    pub fn supi(&self) -> &str {
        &self.supi
    }

    /// Copy of the current charging state
    pub fn state(&self) -> ChfUeState {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.clone()
    }

    /// Apply an update to the charging state
    pub fn update<R>(&self, f: impl FnOnce(&mut ChfUeState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *state)
    }

    pub fn set_notify_uri(&self, uri: impl Into<String>) {
        let uri = uri.into();
        self.update(|state| state.notify_uri = Some(uri));
    }

    /// Attach a charging record key; false if it was already attached
    pub fn attach_record(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        self.update(|state| state.record_keys.insert(key))
    }

    /// True until external charging logic has populated the context
    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.notify_uri.is_none() && state.record_keys.is_empty()
    }
}

/// Check that `supi` is a non-empty IMSI-based SUPI
pub fn validate_supi(supi: &str) -> ChfResult<()> {
    if supi.is_empty() || !supi.starts_with(SUPI_IMSI_PREFIX) {
        return Err(ChfError::InvalidIdentifier(supi.to_string()));
    }
    Ok(())
}

/// SUPI -> UE context registry
#[derive(Debug, Default)]
pub struct UePool {
    ues: DashMap<String, Arc<ChfUe>>,
}

impl UePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the context for `supi`
    ///
    /// Fails with `InvalidIdentifier` for a non-IMSI SUPI and with
    /// `DuplicateSubscriber` when a context already exists; the pool is left
    /// unchanged in both cases.
    pub fn add(&self, supi: &str) -> ChfResult<Arc<ChfUe>> {
        validate_supi(supi)?;

        match self.ues.entry(supi.to_string()) {
            Entry::Occupied(_) => {
                log::debug!("UE context already exists [{supi}]");
                Err(ChfError::DuplicateSubscriber(supi.to_string()))
            }
            Entry::Vacant(vacant) => {
                let ue = Arc::new(ChfUe::new(supi));
                vacant.insert(Arc::clone(&ue));
                log::debug!("Added a UE context [{supi}]");
                Ok(ue)
            }
        }
    }

    /// Find the context for `supi`
    pub fn find_by_supi(&self, supi: &str) -> Option<Arc<ChfUe>> {
        self.ues.get(supi).map(|ue| Arc::clone(ue.value()))
    }

    pub fn contains(&self, supi: &str) -> bool {
        self.ues.contains_key(supi)
    }

    pub fn count(&self) -> usize {
        self.ues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_add_and_find() {
        let pool = UePool::new();
        let ue = pool.add("imsi-208930000000001").unwrap();
        assert_eq!(ue.supi(), "imsi-208930000000001");
        assert!(ue.is_empty());

        let found = pool.find_by_supi("imsi-208930000000001").unwrap();
        assert!(Arc::ptr_eq(&ue, &found));
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn test_find_missing() {
        let pool = UePool::new();
        assert!(pool.find_by_supi("imsi-001").is_none());
        assert!(!pool.contains("imsi-001"));
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_invalid_identifier() {
        let pool = UePool::new();
        assert_eq!(
            pool.add("notimsi-1").unwrap_err(),
            ChfError::InvalidIdentifier("notimsi-1".to_string())
        );
        assert!(matches!(pool.add(""), Err(ChfError::InvalidIdentifier(_))));
        assert!(matches!(
            pool.add("nai-user@example.com"),
            Err(ChfError::InvalidIdentifier(_))
        ));
        assert!(pool.find_by_supi("notimsi-1").is_none());
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_duplicate_subscriber() {
        let pool = UePool::new();
        let first = pool.add("imsi-001").unwrap();
        first.set_notify_uri("http://smf.local/notify");

        assert_eq!(
            pool.add("imsi-001").unwrap_err(),
            ChfError::DuplicateSubscriber("imsi-001".to_string())
        );

        // The original context is untouched
        let found = pool.find_by_supi("imsi-001").unwrap();
        assert!(Arc::ptr_eq(&first, &found));
        assert_eq!(found.state().notify_uri.as_deref(), Some("http://smf.local/notify"));
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn test_concurrent_add_same_supi() {
        let pool = UePool::new();
        let created = AtomicUsize::new(0);
        let duplicates = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..100 {
                s.spawn(|| match pool.add("imsi-001") {
                    Ok(_) => {
                        created.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(ChfError::DuplicateSubscriber(_)) => {
                        duplicates.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                });
            }
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(duplicates.load(Ordering::SeqCst), 99);
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn test_concurrent_add_and_lookup() {
        let pool = UePool::new();

        std::thread::scope(|s| {
            for t in 0..8 {
                let pool = &pool;
                s.spawn(move || {
                    for i in 0..100 {
                        let supi = format!("imsi-{t}{i:05}");
                        let ue = pool.add(&supi).unwrap();
                        let found = pool.find_by_supi(&supi).unwrap();
                        assert!(Arc::ptr_eq(&ue, &found));
                    }
                });
            }
        });

        assert_eq!(pool.count(), 800);
    }

    #[test]
    fn test_ue_state_update() {
        let pool = UePool::new();
        let ue = pool.add("imsi-001").unwrap();

        assert!(ue.attach_record("imsi-001-1"));
        assert!(!ue.attach_record("imsi-001-1"));
        assert!(ue.attach_record("imsi-001-2"));
        assert!(!ue.is_empty());

        let state = pool.find_by_supi("imsi-001").unwrap().state();
        assert_eq!(state.record_keys.len(), 2);
    }
}
