use indns_domain::ZoneFile;
use std::net::IpAddr;
use std::sync::Arc;

/// Outcome of applying one zone file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneApplyStats {
    pub records: usize,
    pub changed: usize,
    pub skipped: usize,
}

/// Authoritative override records, read on every query and mutated by
/// configuration reloads.
pub trait LocalRecordStore: Send + Sync {
    /// Current address set for `name`; empty when unknown.
    fn get(&self, name: &str) -> Arc<[IpAddr]>;

    /// Replaces the address set of `name`. Returns `true` if the stored set
    /// changed (and a new version was assigned).
    fn set(&self, name: &str, addresses: &[IpAddr]) -> bool;

    /// Applies every record of a zone independently.
    fn set_zone(&self, zone: &ZoneFile) -> ZoneApplyStats;
}
