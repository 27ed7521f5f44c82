//! Settings for the canvas project
//!
//! Environment-specific settings are read from TOML files in `settings/`.

use std::env;
use std::path::Path;

use crate::conf::sources::{EnvSource, TomlFileSource};
use crate::conf::{Settings, SettingsBuilder, SettingsError};

/// Variable selecting the settings profile.
pub const PROFILE_VAR: &str = "CANVAS_ENV";

/// Load settings from `settings/` under the current directory.
///
/// `CANVAS_ENV` names the profile file (default `local`). Priority, highest
/// first:
///
/// 1. Environment variables with the `CANVAS_` prefix
/// 2. `settings/{profile}.toml`
/// 3. `settings/base.toml`
/// 4. Default values
pub fn get_settings() -> Result<Settings, SettingsError> {
	let profile = env::var(PROFILE_VAR).unwrap_or_else(|_| "local".to_string());
	let base_dir = env::current_dir().map_err(|error| SettingsError::Invalid {
		key: "settings_dir",
		message: error.to_string(),
	})?;

	load_settings(&base_dir.join("settings"), &profile, EnvSource::new("CANVAS_"))
}

/// Merge defaults, the TOML files in `settings_dir` and `env`.
pub fn load_settings(settings_dir: &Path, profile: &str, env: EnvSource) -> Result<Settings, SettingsError> {
	let settings = SettingsBuilder::new()
		.add_source(Settings::default_source())
		.add_source(TomlFileSource::new(settings_dir.join("base.toml")))
		.add_source(TomlFileSource::new(settings_dir.join(format!("{}.toml", profile))))
		.add_source(env)
		.build()?;

	tracing::debug!(profile, debug = settings.debug, "settings loaded");
	Ok(settings)
}
