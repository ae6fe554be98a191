pub mod zone_reload;

pub use zone_reload::ZoneReloadJob;
