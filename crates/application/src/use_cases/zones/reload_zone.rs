use crate::ports::{LocalRecordStore, ZoneApplyStats, ZoneFileReader};
use indns_domain::{is_zone_file, DomainError, ZoneFileEvent, ZoneFileEventKind};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneReloadOutcome {
    Applied(ZoneApplyStats),
    Ignored,
}

/// Re-parses an override file and applies it to the record store as one
/// batch.
pub struct ReloadZoneUseCase {
    store: Arc<dyn LocalRecordStore>,
    reader: Arc<dyn ZoneFileReader>,
}

impl ReloadZoneUseCase {
    pub fn new(store: Arc<dyn LocalRecordStore>, reader: Arc<dyn ZoneFileReader>) -> Self {
        Self { store, reader }
    }

    pub fn execute(&self, event: &ZoneFileEvent) -> Result<ZoneReloadOutcome, DomainError> {
        if !is_zone_file(&event.path) {
            debug!(path = %event.path.display(), "Ignoring non-zone file");
            return Ok(ZoneReloadOutcome::Ignored);
        }

        match event.kind {
            ZoneFileEventKind::Created | ZoneFileEventKind::Modified => {
                self.apply_file(&event.path).map(ZoneReloadOutcome::Applied)
            }
            // Records from a removed file stay active until overwritten.
            ZoneFileEventKind::Removed => {
                info!(
                    path = %event.path.display(),
                    "Zone file removed, previously applied records are kept"
                );
                Ok(ZoneReloadOutcome::Ignored)
            }
        }
    }

    pub fn apply_file(&self, path: &Path) -> Result<ZoneApplyStats, DomainError> {
        let zone = self.reader.read_zone(path)?;
        let stats = self.store.set_zone(&zone);

        info!(
            path = %path.display(),
            records = stats.records,
            changed = stats.changed,
            skipped = stats.skipped,
            "Zone file applied"
        );

        Ok(stats)
    }
}
