pub mod months;

pub use months::{ConfigError, ContactConfig, MonthEntry, MonthsConfig, Palette, TimelineConfig};
