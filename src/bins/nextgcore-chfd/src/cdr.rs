//! CHF Charging Data Records
//!
//! Local record sequence number allocation and the in-memory CDR ledger.
//! Encoding and transfer of the records to the billing domain happen
//! elsewhere.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use dashmap::DashMap;

/// Used units reported for one rating group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsedUnitContainer {
    pub time: u64,
    pub uplink_volume: u64,
    pub downlink_volume: u64,
    pub service_specific_units: u64,
}

impl UsedUnitContainer {
    pub fn total_volume(&self) -> u64 {
        self.uplink_volume.saturating_add(self.downlink_volume)
    }

    fn accumulate(&mut self, other: &UsedUnitContainer) {
        self.time = self.time.saturating_add(other.time);
        self.uplink_volume = self.uplink_volume.saturating_add(other.uplink_volume);
        self.downlink_volume = self.downlink_volume.saturating_add(other.downlink_volume);
        self.service_specific_units =
            self.service_specific_units.saturating_add(other.service_specific_units);
    }
}

/// Usage of a single rating group within a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipleUnitUsage {
    pub rating_group: u32,
    pub used_units: UsedUnitContainer,
}

/// CHF record (CDR) of one charging session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChfRecord {
    pub local_record_sequence_number: u64,
    pub subscriber_identifier: String,
    pub record_opening_time: SystemTime,
    pub multiple_unit_usage: BTreeMap<u32, MultipleUnitUsage>,
}

impl ChfRecord {
    pub fn new(local_record_sequence_number: u64, subscriber_identifier: impl Into<String>) -> Self {
        Self {
            local_record_sequence_number,
            subscriber_identifier: subscriber_identifier.into(),
            record_opening_time: SystemTime::now(),
            multiple_unit_usage: BTreeMap::new(),
        }
    }

    /// Add used units to the container of `rating_group`
    pub fn add_usage(&mut self, rating_group: u32, used: UsedUnitContainer) {
        self.multiple_unit_usage
            .entry(rating_group)
            .or_insert_with(|| MultipleUnitUsage {
                rating_group,
                ..Default::default()
            })
            .used_units
            .accumulate(&used);
    }

    /// Total uplink + downlink volume over all rating groups
    pub fn total_volume(&self) -> u64 {
        self.multiple_unit_usage
            .values()
            .fold(0u64, |acc, u| acc.saturating_add(u.used_units.total_volume()))
    }
}

/// CDR ledger with the local record sequence counter
///
/// Storing a record under an existing key replaces it; the replaced record
/// is handed back to the caller.
#[derive(Debug, Default)]
pub struct CdrLedger {
    local_record_sequence_number: AtomicU64,
    records: DashMap<String, ChfRecord>,
}

impl CdrLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next local record sequence number, starting at 1
    pub fn allocate_sequence_number(&self) -> u64 {
        self.local_record_sequence_number.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last sequence number handed out, 0 if none
    pub fn last_sequence_number(&self) -> u64 {
        self.local_record_sequence_number.load(Ordering::Relaxed)
    }

    /// Store `record` under `key`, returning the record it replaced
    pub fn store_record(&self, key: impl Into<String>, record: ChfRecord) -> Option<ChfRecord> {
        let key = key.into();
        let replaced = self.records.insert(key.clone(), record);
        if replaced.is_some() {
            log::debug!("Charging record replaced [{key}]");
        }
        replaced
    }

    /// Allocate a sequence number and store a fresh record for `supi`
    pub fn open_record(&self, key: impl Into<String>, supi: &str) -> u64 {
        let seq = self.allocate_sequence_number();
        self.store_record(key, ChfRecord::new(seq, supi));
        seq
    }

    /// Copy of the record stored under `key`
    pub fn find_record(&self, key: &str) -> Option<ChfRecord> {
        self.records.get(key).map(|r| r.value().clone())
    }

    /// Update the record stored under `key` in place
    pub fn update_record<R>(&self, key: &str, f: impl FnOnce(&mut ChfRecord) -> R) -> Option<R> {
        self.records.get_mut(key).map(|mut r| f(r.value_mut()))
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
