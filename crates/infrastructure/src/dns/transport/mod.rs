pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use hickory_proto::op::Message;
use indns_application::ports::UpstreamExchange;
use indns_domain::{DomainError, NetworkKind};
use std::net::SocketAddr;
use std::time::Duration;

/// Plain DNS over UDP or TCP, chosen per exchange by the requester's
/// network kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkExchange;

impl NetworkExchange {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UpstreamExchange for NetworkExchange {
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        network: NetworkKind,
        timeout: Duration,
    ) -> Result<Message, DomainError> {
        let query_bytes = request
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;

        let response_bytes = match network {
            NetworkKind::Udp => udp::send(server, &query_bytes, timeout).await?,
            NetworkKind::Tcp => tcp::send(server, &query_bytes, timeout).await?,
        };

        let response = Message::from_vec(&response_bytes)
            .map_err(|e| DomainError::InvalidDnsMessage(format!("{}: {}", server, e)))?;

        if response.id() != request.id() {
            return Err(DomainError::InvalidDnsMessage(format!(
                "{}: response id {} does not match query id {}",
                server,
                response.id(),
                request.id()
            )));
        }

        Ok(response)
    }
}

pub(crate) fn transport_error(server: SocketAddr, reason: impl std::fmt::Display) -> DomainError {
    DomainError::Transport {
        server: server.to_string(),
        reason: reason.to_string(),
    }
}
