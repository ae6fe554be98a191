#![allow(dead_code)]
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use indns_application::ports::UpstreamExchange;
use indns_domain::{DomainError, NetworkKind};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

/// Builds an `A` query keeping `name` byte for byte, as a decoded wire
/// message would.
pub fn a_query(id: u16, name: &str) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_ascii(name).unwrap(), RecordType::A));
    message
}

pub fn answer_for(query: &Message, ip: Ipv4Addr, ttl: u32) -> Message {
    let mut message = Message::new();
    message
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(query.op_code())
        .set_recursion_desired(query.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);
    message.add_queries(query.queries().iter().cloned());
    if let Some(question) = query.queries().first() {
        message.add_answer(Record::from_rdata(
            question.name().clone(),
            ttl,
            RData::A(A(ip)),
        ));
    }
    message
}

/// Scripted behaviour of one upstream.
#[derive(Debug, Clone)]
pub enum ServerScript {
    Answer { ip: Ipv4Addr, ttl: u32, delay: Duration },
    Status { code: ResponseCode, delay: Duration },
    Fail { delay: Duration },
    Hang,
}

impl ServerScript {
    pub fn answer(ip: [u8; 4], ttl: u32, delay_ms: u64) -> Self {
        Self::Answer {
            ip: Ipv4Addr::from(ip),
            ttl,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn fail(delay_ms: u64) -> Self {
        Self::Fail {
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn status(code: ResponseCode, delay_ms: u64) -> Self {
        Self::Status {
            code,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// In-memory upstream exchange driven by per-server scripts. Delays use
/// tokio time, so paused-clock tests advance deterministically.
#[derive(Default)]
pub struct ScriptedExchange {
    scripts: HashMap<SocketAddr, ServerScript>,
    calls: Mutex<Vec<(SocketAddr, NetworkKind)>>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, server: &str, script: ServerScript) -> Self {
        self.scripts.insert(server.parse().unwrap(), script);
        self
    }

    pub fn calls(&self) -> Vec<(SocketAddr, NetworkKind)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn servers_called(&self) -> Vec<SocketAddr> {
        self.calls().into_iter().map(|(addr, _)| addr).collect()
    }
}

#[async_trait]
impl UpstreamExchange for ScriptedExchange {
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        network: NetworkKind,
        _timeout: Duration,
    ) -> Result<Message, DomainError> {
        self.calls.lock().unwrap().push((server, network));

        let script = self.scripts.get(&server).cloned().unwrap_or(ServerScript::Hang);
        match script {
            ServerScript::Answer { ip, ttl, delay } => {
                tokio::time::sleep(delay).await;
                Ok(answer_for(request, ip, ttl))
            }
            ServerScript::Status { code, delay } => {
                tokio::time::sleep(delay).await;
                let mut reply = answer_for(request, Ipv4Addr::UNSPECIFIED, 60);
                reply.set_response_code(code);
                Ok(reply)
            }
            ServerScript::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(DomainError::Transport {
                    server: server.to_string(),
                    reason: "connection refused".into(),
                })
            }
            ServerScript::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
