pub mod watcher;
pub mod zone_reader;

pub use watcher::DirectoryWatcher;
pub use zone_reader::TomlZoneFileReader;
