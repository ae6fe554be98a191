use indns_application::ports::{LocalRecordStore, ZoneApplyStats, ZoneFileReader};
use indns_domain::{DomainError, ZoneFile, ZoneRecord};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockRecordStore {
    zones: Mutex<Vec<ZoneFile>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones_applied(&self) -> usize {
        self.zones.lock().unwrap().len()
    }

    pub fn applied_names(&self) -> Vec<String> {
        self.zones
            .lock()
            .unwrap()
            .iter()
            .flat_map(|zone| zone.records.iter().map(|r| r.name.clone()))
            .collect()
    }
}

impl LocalRecordStore for MockRecordStore {
    fn get(&self, _name: &str) -> Arc<[IpAddr]> {
        Arc::from(Vec::new())
    }

    fn set(&self, _name: &str, _addresses: &[IpAddr]) -> bool {
        true
    }

    fn set_zone(&self, zone: &ZoneFile) -> ZoneApplyStats {
        self.zones.lock().unwrap().push(zone.clone());
        ZoneApplyStats {
            records: zone.records.len(),
            changed: zone.records.len(),
            skipped: 0,
        }
    }
}

/// Serves canned zones; unknown paths fail like an unreadable file.
#[derive(Default)]
pub struct MockZoneFileReader {
    zones: HashMap<PathBuf, ZoneFile>,
}

impl MockZoneFileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, path: &str, name: &str, ip: &str) -> Self {
        self.zones.insert(
            PathBuf::from(path),
            ZoneFile {
                records: vec![ZoneRecord::new(name, &[ip])],
            },
        );
        self
    }
}

impl ZoneFileReader for MockZoneFileReader {
    fn read_zone(&self, path: &Path) -> Result<ZoneFile, DomainError> {
        self.zones
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::ZoneFile {
                path: path.display().to_string(),
                reason: "No such file".into(),
            })
    }
}
