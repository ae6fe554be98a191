use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// One configuration file's worth of override records.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZoneFile {
    #[serde(default)]
    pub records: Vec<ZoneRecord>,
}

impl ZoneFile {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZoneRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ips: Vec<String>,
}

impl ZoneRecord {
    pub fn new(name: impl Into<String>, ips: &[&str]) -> Self {
        Self {
            name: name.into(),
            ips: ips.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Splits `ips` into parsed addresses and the literals that did not parse.
    pub fn parse_ips(&self) -> (Vec<IpAddr>, Vec<&str>) {
        let mut addresses = Vec::with_capacity(self.ips.len());
        let mut rejected = Vec::new();
        for raw in &self.ips {
            match raw.trim().parse::<IpAddr>() {
                Ok(ip) => addresses.push(ip),
                Err(_) => rejected.push(raw.as_str()),
            }
        }
        (addresses, rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneFileEventKind {
    Created,
    Modified,
    Removed,
}

/// Change observed in the override-record directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFileEvent {
    pub path: PathBuf,
    pub kind: ZoneFileEventKind,
}

impl ZoneFileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ZoneFileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

pub const ZONE_FILE_EXTENSION: &str = "toml";

pub fn is_zone_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == ZONE_FILE_EXTENSION)
}
