use indns_application::ports::ZoneFileReader;
use indns_domain::{DomainError, ZoneFile};
use std::path::Path;

/// Reads override records from `[[records]]` TOML files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlZoneFileReader;

impl TomlZoneFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl ZoneFileReader for TomlZoneFileReader {
    fn read_zone(&self, path: &Path) -> Result<ZoneFile, DomainError> {
        let contents = std::fs::read_to_string(path).map_err(|e| DomainError::ZoneFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        ZoneFile::from_toml(&contents).map_err(|e| DomainError::ZoneFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
