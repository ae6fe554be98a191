mod local_records;
mod upstream_exchange;
mod upstream_lookup;
mod zone_file_reader;

pub use local_records::{LocalRecordStore, ZoneApplyStats};
pub use upstream_exchange::UpstreamExchange;
pub use upstream_lookup::UpstreamLookup;
pub use zone_file_reader::ZoneFileReader;
