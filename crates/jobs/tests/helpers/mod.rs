#![allow(dead_code, unused_imports)]

pub mod mock_ports;

pub use mock_ports::{MockRecordStore, MockZoneFileReader};
