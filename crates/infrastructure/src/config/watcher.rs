//! Polling watcher for the override-record directory.

use indns_domain::{is_zone_file, ZoneFileEvent, ZoneFileEventKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

/// Diffs successive listings of a directory and reports zone file changes.
/// Files without the zone extension never produce events.
pub struct DirectoryWatcher {
    dir: PathBuf,
    poll_interval: Duration,
    known: HashMap<PathBuf, FileStamp>,
}

impl DirectoryWatcher {
    pub fn new(dir: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            poll_interval,
            known: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Takes the baseline listing and returns the zone files present now,
    /// sorted by path. Later polls report changes relative to it.
    pub fn prime(&mut self) -> Vec<PathBuf> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "Config directory does not exist; watching for it");
        }

        self.known = scan(&self.dir);
        let mut paths: Vec<PathBuf> = self.known.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Rescans and returns the events since the previous scan.
    pub fn poll(&mut self) -> Vec<ZoneFileEvent> {
        let current = scan(&self.dir);
        let mut events = Vec::new();

        for (path, stamp) in &current {
            match self.known.get(path) {
                None => events.push(ZoneFileEvent::new(path.clone(), ZoneFileEventKind::Created)),
                Some(previous) if previous != stamp => {
                    events.push(ZoneFileEvent::new(path.clone(), ZoneFileEventKind::Modified))
                }
                Some(_) => {}
            }
        }

        for path in self.known.keys() {
            if !current.contains_key(path) {
                events.push(ZoneFileEvent::new(path.clone(), ZoneFileEventKind::Removed));
            }
        }

        events.sort_by(|a, b| a.path.cmp(&b.path));
        self.known = current;
        events
    }

    /// Polls until cancelled or until the receiving side goes away.
    pub fn start(
        mut self,
        events: mpsc::Sender<ZoneFileEvent>,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                dir = %self.dir.display(),
                interval_ms = self.poll_interval.as_millis() as u64,
                "Watching config directory"
            );

            let mut interval = tokio::time::interval(self.poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; the baseline is already taken.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("DirectoryWatcher: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        for event in self.poll() {
                            debug!(path = %event.path.display(), kind = ?event.kind, "Zone file event");
                            if events.send(event).await.is_err() {
                                debug!("Zone event receiver closed; stopping watcher");
                                return;
                            }
                        }
                    }
                }
            }
        })
    }
}

fn scan(dir: &Path) -> HashMap<PathBuf, FileStamp> {
    let mut found = HashMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Config directory not readable");
            return found;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !is_zone_file(&path) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        found.insert(
            path,
            FileStamp {
                modified: metadata.modified().ok(),
                len: metadata.len(),
            },
        );
    }

    found
}
