use indns_domain::{DomainError, ZoneFile};
use std::path::Path;

pub trait ZoneFileReader: Send + Sync {
    fn read_zone(&self, path: &Path) -> Result<ZoneFile, DomainError>;
}
