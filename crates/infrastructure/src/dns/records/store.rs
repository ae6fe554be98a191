use indns_application::ports::{LocalRecordStore, ZoneApplyStats};
use indns_domain::{normalize_name, RecordEntry, ZoneFile};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

#[derive(Default)]
struct RecordTable {
    version: u64,
    items: HashMap<Arc<str>, RecordEntry>,
}

/// Versioned name → address-set table for override records.
///
/// Entries are replaced whole under the write lock, so a reader sees either
/// the old or the new address set, never a mix.
#[derive(Default)]
pub struct RecordStore {
    table: RwLock<RecordTable>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store-wide version; bumped once per effective change.
    pub fn version(&self) -> u64 {
        self.table.read().unwrap_or_else(|e| e.into_inner()).version
    }

    pub fn entry(&self, name: &str) -> Option<RecordEntry> {
        let key = normalize_name(name);
        self.table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .get(key.as_str())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .values()
            .filter(|entry| !entry.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drops duplicates, keeping first-seen order.
fn dedup_addresses(addresses: &[IpAddr]) -> Vec<IpAddr> {
    let mut seen = HashSet::with_capacity(addresses.len());
    addresses
        .iter()
        .copied()
        .filter(|ip| seen.insert(*ip))
        .collect()
}

fn same_set(current: &[IpAddr], next: &[IpAddr]) -> bool {
    current.len() == next.len() && {
        let current: HashSet<&IpAddr> = current.iter().collect();
        next.iter().all(|ip| current.contains(ip))
    }
}

impl LocalRecordStore for RecordStore {
    fn get(&self, name: &str) -> Arc<[IpAddr]> {
        let key = normalize_name(name);
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        match table.items.get(key.as_str()) {
            Some(entry) => Arc::clone(&entry.addresses),
            None => Arc::from(Vec::new()),
        }
    }

    fn set(&self, name: &str, addresses: &[IpAddr]) -> bool {
        let key = normalize_name(name);
        let addresses = dedup_addresses(addresses);

        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());

        let unchanged = match table.items.get(key.as_str()) {
            Some(entry) => same_set(&entry.addresses, &addresses),
            None => addresses.is_empty(),
        };
        if unchanged {
            return false;
        }

        table.version += 1;
        let version = table.version;
        let name: Arc<str> = Arc::from(key);

        info!(name = %name, addresses = ?addresses, version, "Record set");

        table.items.insert(
            Arc::clone(&name),
            RecordEntry {
                name,
                addresses: Arc::from(addresses),
                version,
            },
        );
        true
    }

    fn set_zone(&self, zone: &ZoneFile) -> ZoneApplyStats {
        let mut stats = ZoneApplyStats::default();

        for record in &zone.records {
            stats.records += 1;

            if normalize_name(&record.name).is_empty() {
                warn!(ips = ?record.ips, "Skipping zone record without a name");
                stats.skipped += 1;
                continue;
            }

            let (addresses, rejected) = record.parse_ips();
            if !rejected.is_empty() {
                warn!(name = %record.name, rejected = ?rejected, "Discarding invalid addresses");
            }

            if self.set(&record.name, &addresses) {
                stats.changed += 1;
            }
        }

        stats
    }
}
