use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Overall bound for one lookup and read/write timeout of each exchange.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Delay before the next upstream is started.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    #[serde(default = "default_min_cache_ttl")]
    pub min_cache_ttl: u32,

    #[serde(default = "default_max_cache_ttl")]
    pub max_cache_ttl: u32,

    /// TTL on answers synthesized from override records.
    #[serde(default = "default_local_record_ttl")]
    pub local_record_ttl: u32,
}

impl ResolverConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            stagger_ms: default_stagger_ms(),
            min_cache_ttl: default_min_cache_ttl(),
            max_cache_ttl: default_max_cache_ttl(),
            local_record_ttl: default_local_record_ttl(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_stagger_ms() -> u64 {
    500
}

fn default_min_cache_ttl() -> u32 {
    60
}

fn default_max_cache_ttl() -> u32 {
    86_400
}

fn default_local_record_ttl() -> u32 {
    10
}
