use std::net::IpAddr;
use std::sync::Arc;

/// Authoritative override for one host name.
///
/// `version` is assigned from the store-wide counter on every effective
/// change, so versions are unique and increasing across all entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub name: Arc<str>,
    pub addresses: Arc<[IpAddr]>,
    pub version: u64,
}

impl RecordEntry {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Canonical key for override lookups: no trailing dot, ASCII lower case.
pub fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
