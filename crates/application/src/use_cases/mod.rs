pub mod dns;
pub mod zones;

pub use dns::{failure_response, reply_envelope, DnsReply, HandleDnsQueryUseCase, Route};
pub use zones::{ReloadZoneUseCase, ZoneReloadOutcome};
