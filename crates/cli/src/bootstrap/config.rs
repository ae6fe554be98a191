use indns_domain::Config;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FALLBACK_PREFIX: &str = "/opt/sysinner/indns";

/// Install root: the parent of the directory holding the binary.
pub fn install_prefix() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_PREFIX))
}

/// Writes the loaded configuration back so defaults become visible.
/// Command-line overrides must not be part of `config`.
pub fn persist_config(config: &Config, path: &Path) {
    match config.save(path) {
        Ok(()) => info!(path = %path.display(), "Effective configuration saved"),
        Err(e) => warn!(error = %e, "Could not save effective configuration"),
    }
}
