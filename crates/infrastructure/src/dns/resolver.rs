//! Staggered upstream racing with answer caching.

use super::cache::ResolutionCache;
use super::upstream::UpstreamRegistry;
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use indns_application::ports::{UpstreamExchange, UpstreamLookup};
use indns_domain::{DomainError, NetworkKind, UpstreamServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

pub const DEFAULT_STAGGER: Duration = Duration::from_millis(500);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Tries upstream servers in configured order, starting the next one each
/// time the stagger interval passes without a usable answer.
///
/// Attempts run as detached tasks: an answer that arrives after the lookup
/// has returned is still written to the cache.
pub struct RacingResolver {
    registry: UpstreamRegistry,
    cache: Arc<ResolutionCache>,
    exchange: Arc<dyn UpstreamExchange>,
    stagger: Duration,
    query_timeout: Duration,
}

impl RacingResolver {
    pub fn new(
        registry: UpstreamRegistry,
        cache: Arc<ResolutionCache>,
        exchange: Arc<dyn UpstreamExchange>,
    ) -> Self {
        Self {
            registry,
            cache,
            exchange,
            stagger: DEFAULT_STAGGER,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_timing(mut self, stagger: Duration, query_timeout: Duration) -> Self {
        self.stagger = stagger;
        self.query_timeout = query_timeout;
        self
    }

    pub fn registry(&self) -> &UpstreamRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    fn spawn_attempt(
        &self,
        server: UpstreamServer,
        name: Arc<str>,
        request: Arc<Message>,
        network: NetworkKind,
        tx: mpsc::Sender<Message>,
    ) {
        let exchange = Arc::clone(&self.exchange);
        let cache = Arc::clone(&self.cache);
        let io_timeout = self.query_timeout;

        tokio::spawn(async move {
            let started = Instant::now();
            let result = exchange
                .exchange(&request, server.socket_addr(), network, io_timeout)
                .await
                .and_then(|response| check_status(&server, response));

            match result {
                Ok(response) => {
                    debug!(
                        server = %server,
                        domain = %name,
                        latency_ms = started.elapsed().as_millis() as u64,
                        "Upstream answered"
                    );
                    cache.insert(&name, response.clone());
                    // The caller may already have returned; the cache write
                    // above is what matters then.
                    let _ = tx.send(response).await;
                }
                Err(e) => {
                    debug!(server = %server, domain = %name, error = %e, "Upstream attempt discarded");
                }
            }
        });
    }
}

fn check_status(server: &UpstreamServer, response: Message) -> Result<Message, DomainError> {
    if response.response_code() == ResponseCode::NoError {
        Ok(response)
    } else {
        Err(DomainError::UpstreamStatus {
            server: server.to_string(),
            code: response.response_code().to_string(),
        })
    }
}

fn exhausted(name: &str, servers: usize, started: Instant) -> DomainError {
    warn!(
        domain = %name,
        servers,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Every upstream attempt failed"
    );
    DomainError::UpstreamExhausted
}

#[async_trait]
impl UpstreamLookup for RacingResolver {
    async fn lookup(
        &self,
        network: NetworkKind,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let servers = self.registry.servers();
        if servers.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }

        let query = request
            .queries()
            .first()
            .ok_or_else(|| DomainError::UnsupportedQuery("empty question section".into()))?;
        let name: Arc<str> = Arc::from(query.name().to_utf8());

        if let Some(mut cached) = self.cache.get(&name) {
            debug!(domain = %name, "Cache hit");
            cached.set_id(request.id());
            return Ok(cached);
        }

        let started = Instant::now();
        let request = Arc::new(request.clone());
        let (tx, mut rx) = mpsc::channel(servers.len());
        let mut tx = Some(tx);
        let last = servers.len() - 1;

        for (index, server) in servers.iter().enumerate() {
            // The last attempt takes our sender, so recv yields None as soon
            // as every attempt has failed.
            let sender = if index == last { tx.take() } else { tx.clone() };
            let Some(sender) = sender else { break };
            self.spawn_attempt(
                *server,
                Arc::clone(&name),
                Arc::clone(&request),
                network,
                sender,
            );

            match timeout(self.stagger, rx.recv()).await {
                Ok(Some(response)) => return Ok(response),
                Ok(None) => return Err(exhausted(&name, servers.len(), started)),
                Err(_) => {}
            }
        }

        match timeout(self.query_timeout, rx.recv()).await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(exhausted(&name, servers.len(), started)),
            Err(_) => {
                warn!(
                    domain = %name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Upstream lookup timed out"
                );
                Err(DomainError::QueryTimeout)
            }
        }
    }
}
