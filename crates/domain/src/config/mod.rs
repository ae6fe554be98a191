pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod server;
pub mod watcher;

pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use watcher::WatcherConfig;
