use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No upstream nameserver configured")]
    NoUpstreamServers,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("All upstream nameservers failed")]
    UpstreamExhausted,

    #[error("Invalid upstream address: {0}")]
    InvalidUpstream(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Upstream {server} answered with {code}")]
    UpstreamStatus { server: String, code: String },

    #[error("Zone file {path}: {reason}")]
    ZoneFile { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),
}
