use crate::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Upstream nameserver, always an IP literal plus port.
///
/// Hostnames are rejected: the registry must be usable without resolving
/// anything first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpstreamServer {
    addr: SocketAddr,
}

impl UpstreamServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Normalized "ip:port" form used for de-duplication.
    pub fn key(&self) -> String {
        self.addr.to_string()
    }
}

impl fmt::Display for UpstreamServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

impl FromStr for UpstreamServer {
    type Err = DomainError;

    /// Accepts `ip`, `ip:port`, `[v6]` and `[v6]:port`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(DomainError::InvalidUpstream("empty address".to_string()));
        }

        if let Ok(addr) = spec.parse::<SocketAddr>() {
            if addr.port() == 0 {
                return Err(DomainError::InvalidUpstream(format!(
                    "{}: port must be in 1..=65535",
                    spec
                )));
            }
            return Ok(Self::new(addr));
        }

        let bare = spec
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(spec);
        if let Ok(ip) = bare.parse::<IpAddr>() {
            return Ok(Self::new(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }

        match spec.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => {
                let ip = host.parse::<IpAddr>().map_err(|_| {
                    DomainError::InvalidUpstream(format!("{}: host is not an IP address", spec))
                })?;
                let port = port
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| {
                        DomainError::InvalidUpstream(format!("{}: invalid port", spec))
                    })?;
                Ok(Self::new(SocketAddr::new(ip, port)))
            }
            _ => Err(DomainError::InvalidUpstream(format!(
                "{}: host is not an IP address",
                spec
            ))),
        }
    }
}
