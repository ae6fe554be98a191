use async_trait::async_trait;
use hickory_proto::op::Message;
use indns_domain::{DomainError, NetworkKind};
use std::net::SocketAddr;
use std::time::Duration;

/// One request/response round trip with a single upstream server.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    /// `timeout` bounds each read and write of the exchange.
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        network: NetworkKind,
        timeout: Duration,
    ) -> Result<Message, DomainError>;
}
