#![allow(dead_code, unused_imports)]

mod mock_ports;

pub use mock_ports::{
    a_query, upstream_answer, MockRecordStore, MockUpstreamLookup, MockZoneFileReader,
};
