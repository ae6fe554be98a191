use indns_application::use_cases::{HandleDnsQueryUseCase, ReloadZoneUseCase};
use indns_domain::Config;
use indns_infrastructure::config::TomlZoneFileReader;
use indns_infrastructure::dns::{
    DnsRequestHandler, NetworkExchange, RacingResolver, RecordStore, ResolutionCache, TtlBounds,
    UpstreamRegistry,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Process-wide service objects, built once at startup.
pub struct DnsServices {
    pub store: Arc<RecordStore>,
    pub cache: Arc<ResolutionCache>,
    pub handler: Arc<DnsRequestHandler>,
    pub reload: Arc<ReloadZoneUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config, bind_addr: SocketAddr) -> Self {
        let store = Arc::new(RecordStore::new());
        let registry = UpstreamRegistry::from_config(&config.server, bind_addr);

        let resolver_cfg = &config.resolver;
        let cache = Arc::new(ResolutionCache::new(TtlBounds::new(
            resolver_cfg.min_cache_ttl,
            resolver_cfg.max_cache_ttl,
        )));

        let resolver = RacingResolver::new(registry, cache.clone(), Arc::new(NetworkExchange::new()))
            .with_timing(resolver_cfg.stagger(), resolver_cfg.query_timeout());

        let query_use_case = Arc::new(
            HandleDnsQueryUseCase::new(store.clone(), Arc::new(resolver))
                .with_local_record_ttl(resolver_cfg.local_record_ttl),
        );

        let reload = Arc::new(ReloadZoneUseCase::new(
            store.clone(),
            Arc::new(TomlZoneFileReader::new()),
        ));

        info!(
            stagger_ms = resolver_cfg.stagger_ms,
            query_timeout_ms = resolver_cfg.query_timeout_ms,
            min_cache_ttl = resolver_cfg.min_cache_ttl,
            max_cache_ttl = resolver_cfg.max_cache_ttl,
            "DNS services initialized"
        );

        Self {
            store,
            cache,
            handler: Arc::new(DnsRequestHandler::new(query_use_case)),
            reload,
        }
    }
}
