//! Answer cache for forwarded lookups.
//!
//! Keyed by the exact query name text, trailing dot included. Entries are
//! never evicted; an expired entry is simply ignored and later overwritten.

use hickory_proto::op::Message;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_MIN_CACHE_TTL: u32 = 60;
pub const DEFAULT_MAX_CACHE_TTL: u32 = 86_400;

/// Clamp applied to upstream TTLs before an answer is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlBounds {
    pub min: u32,
    pub max: u32,
}

impl TtlBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, ttl: u32) -> u32 {
        ttl.max(self.min).min(self.max)
    }
}

impl Default for TtlBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CACHE_TTL, DEFAULT_MAX_CACHE_TTL)
    }
}

/// Smallest positive answer TTL, clamped. Falls back to the floor when the
/// answer section holds no positive TTL.
pub fn effective_ttl(message: &Message, bounds: TtlBounds) -> u32 {
    let lowest = message
        .answers()
        .iter()
        .map(|record| record.ttl())
        .filter(|ttl| *ttl > 0)
        .min();

    match lowest {
        Some(ttl) => bounds.clamp(ttl),
        None => bounds.min,
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    message: Message,
    expiry: Instant,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    bounds: TtlBounds,
}

impl ResolutionCache {
    pub fn new(bounds: TtlBounds) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            bounds,
        }
    }

    pub fn bounds(&self) -> TtlBounds {
        self.bounds
    }

    /// Unexpired answer for `name`, as stored.
    pub fn get(&self, name: &str) -> Option<Message> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(name)?;
        if Instant::now() < entry.expiry {
            Some(entry.message.clone())
        } else {
            None
        }
    }

    /// Stores `message` under `name`, replacing any previous entry.
    /// Returns the TTL that was applied.
    pub fn insert(&self, name: &str, message: Message) -> u32 {
        let ttl = effective_ttl(&message, self.bounds);
        let expiry = Instant::now() + Duration::from_secs(u64::from(ttl));

        debug!(domain = %name, ttl, "Caching upstream answer");

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(name.to_string(), CacheEntry { message, expiry });
        ttl
    }

    /// Expiry of the stored entry, whether or not it has passed.
    pub fn expiry(&self, name: &str) -> Option<Instant> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(name).map(|entry| entry.expiry)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
