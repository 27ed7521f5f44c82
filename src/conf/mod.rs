//! Layered settings: defaults, TOML files and environment variables.

mod settings;
pub mod sources;

pub use settings::{Settings, SettingsBuilder, SettingsError};
