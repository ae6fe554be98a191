pub mod registry;
pub mod resolv_conf;

pub use registry::{UpstreamRegistry, UpstreamRegistryBuilder};
