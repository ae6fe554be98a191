use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use indns_application::ports::{
    LocalRecordStore, UpstreamLookup, ZoneApplyStats, ZoneFileReader,
};
use indns_domain::{normalize_name, DomainError, NetworkKind, ZoneFile};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

pub fn a_query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub fn upstream_answer(request: &Message, ip: Ipv4Addr, ttl: u32) -> Message {
    let mut message = Message::new();
    message
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::NoError);
    message.add_queries(request.queries().iter().cloned());
    let name = request.queries()[0].name().clone();
    message.add_answer(Record::from_rdata(name, ttl, RData::A(A(ip))));
    message
}

#[derive(Default)]
pub struct MockRecordStore {
    items: RwLock<HashMap<String, Arc<[IpAddr]>>>,
    zones_applied: AtomicUsize,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, ips: &[&str]) {
        let addrs: Vec<IpAddr> = ips.iter().map(|s| s.parse().unwrap()).collect();
        self.items
            .write()
            .unwrap()
            .insert(normalize_name(name), Arc::from(addrs));
    }

    pub fn zones_applied(&self) -> usize {
        self.zones_applied.load(Ordering::SeqCst)
    }
}

impl LocalRecordStore for MockRecordStore {
    fn get(&self, name: &str) -> Arc<[IpAddr]> {
        self.items
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn set(&self, name: &str, addresses: &[IpAddr]) -> bool {
        self.items
            .write()
            .unwrap()
            .insert(normalize_name(name), Arc::from(addresses.to_vec()));
        true
    }

    fn set_zone(&self, zone: &ZoneFile) -> ZoneApplyStats {
        self.zones_applied.fetch_add(1, Ordering::SeqCst);
        let mut stats = ZoneApplyStats::default();
        for record in &zone.records {
            stats.records += 1;
            let (ips, _) = record.parse_ips();
            if self.set(&record.name, &ips) {
                stats.changed += 1;
            }
        }
        stats
    }
}

/// Upstream double: answers with a fixed address or fails.
pub struct MockUpstreamLookup {
    answer: Mutex<Option<Ipv4Addr>>,
    calls: AtomicUsize,
    networks: Mutex<Vec<NetworkKind>>,
}

impl MockUpstreamLookup {
    pub fn answering(ip: &str) -> Self {
        Self {
            answer: Mutex::new(Some(ip.parse().unwrap())),
            calls: AtomicUsize::new(0),
            networks: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
            networks: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn networks(&self) -> Vec<NetworkKind> {
        self.networks.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamLookup for MockUpstreamLookup {
    async fn lookup(
        &self,
        network: NetworkKind,
        request: &Message,
    ) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.networks.lock().unwrap().push(network);
        match *self.answer.lock().unwrap() {
            Some(ip) => Ok(upstream_answer(request, ip, 300)),
            None => Err(DomainError::QueryTimeout),
        }
    }
}

#[derive(Default)]
pub struct MockZoneFileReader {
    zones: Mutex<HashMap<PathBuf, ZoneFile>>,
    reads: AtomicUsize,
}

impl MockZoneFileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: &str, zone: ZoneFile) {
        self.zones.lock().unwrap().insert(PathBuf::from(path), zone);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ZoneFileReader for MockZoneFileReader {
    fn read_zone(&self, path: &Path) -> Result<ZoneFile, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.zones
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::ZoneFile {
                path: path.display().to_string(),
                reason: "not found".to_string(),
            })
    }
}
