use async_trait::async_trait;
use hickory_proto::op::Message;
use indns_domain::{DomainError, NetworkKind};

/// Resolves a query through the upstream servers (with caching).
#[async_trait]
pub trait UpstreamLookup: Send + Sync {
    async fn lookup(&self, network: NetworkKind, request: &Message)
        -> Result<Message, DomainError>;
}
