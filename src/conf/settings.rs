use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::sources::{ConfigSource, DefaultSource, SourceError};

/// Errors raised while building or validating settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("invalid value for '{key}': {message}")]
	Invalid { key: &'static str, message: String },
}

/// Project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Debug mode: detailed 404 pages and static serving by default.
	pub debug: bool,

	/// Address `runserver` binds when none is given on the command line
	pub bind_address: String,

	/// Directory searched for templates before the built-in ones
	pub template_dir: PathBuf,

	/// Directory static assets are served from
	pub static_dir: PathBuf,

	/// URL prefix for static assets; starts and ends with `/`
	pub static_url: String,

	/// Serve static files from this process. `None` follows `debug`.
	pub serve_static: Option<bool>,

	/// Redirect `/path` to `/path/` when only the latter resolves
	pub append_slash: bool,

	/// Installed application labels
	pub installed_apps: Vec<String>,

	/// Default tracing filter
	pub log_level: String,

	/// Grace period for in-flight connections on shutdown
	pub shutdown_timeout_secs: u64,

	/// Heading of the admin index page
	pub site_header: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: true,
			bind_address: "127.0.0.1:8000".to_string(),
			template_dir: PathBuf::from("templates"),
			static_dir: PathBuf::from("static"),
			static_url: "/static/".to_string(),
			serve_static: None,
			append_slash: true,
			installed_apps: vec![
				"editor".to_string(),
				"management".to_string(),
				"admin".to_string(),
				"staticfiles".to_string(),
			],
			log_level: "info".to_string(),
			shutdown_timeout_secs: 30,
			site_header: "Canvas administration".to_string(),
		}
	}
}

impl Settings {
	/// Whether static files are served by this process.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::conf::Settings;
	///
	/// let mut settings = Settings::default();
	/// assert!(settings.serves_static());
	/// settings.debug = false;
	/// assert!(!settings.serves_static());
	/// settings.serve_static = Some(true);
	/// assert!(settings.serves_static());
	/// ```
	pub fn serves_static(&self) -> bool {
		self.serve_static.unwrap_or(self.debug)
	}

	pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
		self.bind_address
			.parse()
			.map_err(|e: std::net::AddrParseError| SettingsError::Invalid {
				key: "bind_address",
				message: format!("{} ({})", self.bind_address, e),
			})
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if !self.static_url.starts_with('/') || !self.static_url.ends_with('/') {
			return Err(SettingsError::Invalid {
				key: "static_url",
				message: format!("'{}' must start and end with '/'", self.static_url),
			});
		}
		if self.static_url == "/" {
			return Err(SettingsError::Invalid {
				key: "static_url",
				message: "must not be the site root".to_string(),
			});
		}

		self.socket_addr()?;

		let mut seen = HashSet::new();
		for app in &self.installed_apps {
			if !seen.insert(app.as_str()) {
				return Err(SettingsError::Invalid {
					key: "installed_apps",
					message: format!("'{}' is listed more than once", app),
				});
			}
		}

		if self.log_level.trim().is_empty() {
			return Err(SettingsError::Invalid {
				key: "log_level",
				message: "must not be empty".to_string(),
			});
		}

		Ok(())
	}

	/// Default values as a configuration source.
	pub fn default_source() -> DefaultSource {
		let defaults = serde_json::to_value(Settings::default()).unwrap_or(Value::Null);
		let mut source = DefaultSource::new();
		if let Value::Object(map) = defaults {
			for (key, value) in map {
				source = source.with_value(key, value);
			}
		}
		source
	}
}

/// Merges configuration sources by priority into [`Settings`].
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge all sources. Higher priority wins; equal priorities apply in
	/// the order they were added.
	pub fn merge(self) -> Result<IndexMap<String, Value>, SettingsError> {
		let mut sources = self.sources;
		// Stable sort keeps insertion order among equal priorities
		sources.sort_by_key(|s| s.priority());

		let mut merged = IndexMap::new();
		for source in &sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			merged.extend(values);
		}
		Ok(merged)
	}

	/// Merge, deserialize and validate.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::conf::SettingsBuilder;
	/// use canvas::conf::sources::EnvSource;
	///
	/// let settings = SettingsBuilder::new()
	///     .add_source(EnvSource::new("CANVAS_").with_vars([("CANVAS_DEBUG", "false")]))
	///     .build()
	///     .unwrap();
	/// assert!(!settings.debug);
	/// assert_eq!(settings.static_url, "/static/");
	/// ```
	pub fn build(self) -> Result<Settings, SettingsError> {
		let merged = self.merge()?;
		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		let settings: Settings = serde_json::from_value(Value::Object(object))?;
		settings.validate()?;
		Ok(settings)
	}
}
