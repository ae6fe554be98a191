//! indns Domain Layer
pub mod config;
pub mod errors;
pub mod network;
pub mod record;
pub mod upstream;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use network::NetworkKind;
pub use record::{normalize_name, RecordEntry};
pub use upstream::{UpstreamServer, DEFAULT_DNS_PORT};
pub use zone::{is_zone_file, ZoneFile, ZoneFileEvent, ZoneFileEventKind, ZoneRecord};
