use indns_application::use_cases::{ReloadZoneUseCase, ZoneReloadOutcome};
use indns_domain::ZoneFileEvent;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Single consumer of zone file events; applies one file at a time.
pub struct ZoneReloadJob {
    reload: Arc<ReloadZoneUseCase>,
    shutdown: CancellationToken,
}

impl ZoneReloadJob {
    pub fn new(reload: Arc<ReloadZoneUseCase>) -> Self {
        Self {
            reload,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Applies every file found at startup. Returns how many applied cleanly.
    pub fn load_existing(&self, paths: &[PathBuf]) -> usize {
        let mut applied = 0;
        for path in paths {
            match self.reload.apply_file(path) {
                Ok(_) => applied += 1,
                Err(e) => error!(error = %e, "Failed to load zone file"),
            }
        }
        info!(files = paths.len(), applied, "Initial zone files loaded");
        applied
    }

    fn handle(&self, event: &ZoneFileEvent) {
        match self.reload.execute(event) {
            Ok(ZoneReloadOutcome::Applied(_)) => {}
            Ok(ZoneReloadOutcome::Ignored) => {
                debug!(path = %event.path.display(), kind = ?event.kind, "Zone event ignored");
            }
            Err(e) => error!(error = %e, "Zone reload failed"),
        }
    }

    pub fn start(self, mut events: mpsc::Receiver<ZoneFileEvent>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("Starting zone reload job");
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("ZoneReloadJob: shutting down");
                        break;
                    }
                    event = events.recv() => match event {
                        Some(event) => self.handle(&event),
                        None => {
                            info!("ZoneReloadJob: event source closed");
                            break;
                        }
                    }
                }
            }
        })
    }
}
