mod config;
mod logging;

pub use config::{install_prefix, persist_config};
pub use logging::init_logging;
