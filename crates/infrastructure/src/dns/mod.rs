pub mod cache;
pub mod records;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod upstream;

pub use cache::{effective_ttl, ResolutionCache, TtlBounds};
pub use records::RecordStore;
pub use resolver::RacingResolver;
pub use server::DnsRequestHandler;
pub use transport::NetworkExchange;
pub use upstream::{UpstreamRegistry, UpstreamRegistryBuilder};
