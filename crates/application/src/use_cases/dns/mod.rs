pub mod handle_dns_query;

pub use handle_dns_query::{
    failure_response, reply_envelope, DnsReply, HandleDnsQueryUseCase, Route,
};
