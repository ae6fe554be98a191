use super::resolv_conf::parse_nameservers;
use indns_domain::config::ServerConfig;
use indns_domain::{DomainError, UpstreamServer};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ordered, de-duplicated upstream list. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct UpstreamRegistry {
    servers: Arc<[UpstreamServer]>,
}

impl UpstreamRegistry {
    pub fn builder() -> UpstreamRegistryBuilder {
        UpstreamRegistryBuilder::default()
    }

    /// Explicit nameservers first, then each resolver file in order.
    pub fn from_config(config: &ServerConfig, bind_addr: SocketAddr) -> Self {
        let mut builder = Self::builder().exclude(bind_addr);
        builder.add_servers(&config.name_servers);

        for file in &config.resolv_files {
            let path = Path::new(file);
            match builder.add_resolv_file(path) {
                Ok(added) => debug!(path = %path.display(), added, "Resolver file read"),
                Err(e) => info!(error = %e, "Resolver file skipped"),
            }
        }

        let registry = builder.build();
        if registry.is_empty() {
            warn!("No upstream nameservers configured; only local records will resolve");
        } else {
            info!(count = registry.len(), "Upstream registry ready");
        }
        registry
    }

    pub fn servers(&self) -> &[UpstreamServer] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct UpstreamRegistryBuilder {
    seen: HashSet<String>,
    servers: Vec<UpstreamServer>,
    excluded: Option<SocketAddr>,
}

impl UpstreamRegistryBuilder {
    /// Never register the service's own listener as an upstream.
    pub fn exclude(mut self, bind_addr: SocketAddr) -> Self {
        self.excluded = Some(bind_addr);
        self
    }

    fn is_excluded(&self, server: &UpstreamServer) -> bool {
        let Some(bind) = self.excluded else {
            return false;
        };
        let addr = server.socket_addr();
        addr.port() == bind.port()
            && (addr.ip() == bind.ip() || (bind.ip().is_unspecified() && addr.ip().is_loopback()))
    }

    /// Parses `host[:port]` and appends it unless already present.
    ///
    /// Returns `Ok(false)` for duplicates and for the excluded listener.
    pub fn add_server(&mut self, spec: &str) -> Result<bool, DomainError> {
        let server: UpstreamServer = spec.parse()?;

        if self.is_excluded(&server) {
            warn!(nameserver = %server, "Skipping nameserver pointing at this service");
            return Ok(false);
        }

        if !self.seen.insert(server.key()) {
            return Ok(false);
        }

        info!(nameserver = %server, "Nameserver added");
        self.servers.push(server);
        Ok(true)
    }

    /// Adds each spec, logging and skipping invalid ones.
    pub fn add_servers<I, S>(&mut self, specs: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for spec in specs {
            match self.add_server(spec.as_ref()) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Skipping nameserver"),
            }
        }
        added
    }

    pub fn add_resolv_conf(&mut self, contents: &str) -> usize {
        self.add_servers(parse_nameservers(contents))
    }

    pub fn add_resolv_file(&mut self, path: &Path) -> Result<usize, DomainError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(self.add_resolv_conf(&contents))
    }

    pub fn build(self) -> UpstreamRegistry {
        UpstreamRegistry {
            servers: Arc::from(self.servers),
        }
    }
}
