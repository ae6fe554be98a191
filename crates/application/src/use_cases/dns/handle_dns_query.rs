use crate::ports::{LocalRecordStore, UpstreamLookup};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record, RecordType};
use indns_domain::{normalize_name, NetworkKind};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const DEFAULT_LOCAL_RECORD_TTL: u32 = 10;

/// Which path produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LocalAnswered,
    ForwardedSuccess,
    ForwardedFailed,
    Rejected,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalAnswered => "LOCAL",
            Self::ForwardedSuccess => "FORWARDED",
            Self::ForwardedFailed => "SERVFAIL",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DnsReply {
    pub route: Route,
    pub message: Message,
}

/// Per-request routing: local override first, upstream otherwise.
pub struct HandleDnsQueryUseCase {
    records: Arc<dyn LocalRecordStore>,
    upstream: Arc<dyn UpstreamLookup>,
    local_record_ttl: u32,
}

impl HandleDnsQueryUseCase {
    pub fn new(records: Arc<dyn LocalRecordStore>, upstream: Arc<dyn UpstreamLookup>) -> Self {
        Self {
            records,
            upstream,
            local_record_ttl: DEFAULT_LOCAL_RECORD_TTL,
        }
    }

    pub fn with_local_record_ttl(mut self, ttl: u32) -> Self {
        self.local_record_ttl = ttl;
        self
    }

    pub async fn execute(&self, request: &Message, network: NetworkKind) -> DnsReply {
        let start = Instant::now();

        let query = match request.queries().first() {
            Some(query) if query.query_type() == RecordType::A => query,
            Some(query) => {
                debug!(record_type = ?query.query_type(), "Unsupported query type");
                return Self::reply(Route::Rejected, failure_response(request));
            }
            None => {
                debug!(id = request.id(), "Query without question section");
                return Self::reply(Route::Rejected, failure_response(request));
            }
        };

        let name = normalize_name(&query.name().to_utf8());
        let addresses: Vec<Ipv4Addr> = self
            .records
            .get(&name)
            .iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(_) => None,
            })
            .collect();

        if !addresses.is_empty() {
            let mut response = reply_envelope(request);
            for ip in &addresses {
                response.add_answer(Record::from_rdata(
                    query.name().clone(),
                    self.local_record_ttl,
                    RData::A(A(*ip)),
                ));
            }
            debug!(domain = %name, answers = addresses.len(), "Answered from local records");
            return Self::reply(Route::LocalAnswered, response);
        }

        match self.upstream.lookup(network, request).await {
            Ok(response) => {
                debug!(
                    domain = %name,
                    network = %network,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Upstream resolution succeeded"
                );
                Self::reply(Route::ForwardedSuccess, response)
            }
            Err(e) => {
                warn!(domain = %name, network = %network, error = %e, "Upstream resolution failed");
                Self::reply(Route::ForwardedFailed, failure_response(request))
            }
        }
    }

    fn reply(route: Route, message: Message) -> DnsReply {
        DnsReply { route, message }
    }
}

/// Reply header mirroring the request, with the question echoed.
pub fn reply_envelope(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);
    reply.add_queries(request.queries().iter().cloned());
    reply
}

/// Uniform failure reply; never carries internal error detail.
pub fn failure_response(request: &Message) -> Message {
    let mut reply = reply_envelope(request);
    reply.set_response_code(ResponseCode::ServFail);
    reply
}
