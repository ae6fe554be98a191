#![allow(dead_code, unused_imports)]

pub mod dns_server_mock;
pub mod mock_exchange;

pub use dns_server_mock::{MockDnsServer, MockTcpDnsServer};
pub use mock_exchange::{a_query, answer_for, ScriptedExchange, ServerScript};
