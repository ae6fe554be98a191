pub mod reload_zone;

pub use reload_zone::{ReloadZoneUseCase, ZoneReloadOutcome};
