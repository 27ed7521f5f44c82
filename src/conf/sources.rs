//! Configuration sources for the layered settings system
//!
//! Sources are merged in priority order (environment variables > TOML
//! files > defaults).

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Keys whose environment values are parsed as booleans.
const BOOL_KEYS: &[&str] = &["debug", "append_slash", "serve_static"];

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &["installed_apps"];

/// Keys whose environment values are integers. Everything else stays a string.
const NUMBER_KEYS: &[&str] = &["shutdown_timeout_secs"];

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Environment variable configuration source
///
/// Only variables starting with the prefix are read; the prefix is stripped
/// and the rest lowercased (`CANVAS_DEBUG` becomes `debug`).
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// # Examples
	///
	/// ```
	/// use canvas::conf::sources::EnvSource;
	///
	/// let source = EnvSource::new("CANVAS_");
	/// ```
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			vars: None,
		}
	}

	/// Read from the given pairs instead of the process environment.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::new("CANVAS_").with_vars([("CANVAS_DEBUG", "0")]);
	/// let values = source.load().unwrap();
	/// assert_eq!(values["debug"], serde_json::Value::Bool(false));
	/// ```
	pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		);
		self
	}

	fn parse_value(key: &str, value: String) -> Value {
		if BOOL_KEYS.contains(&key) {
			return match value.trim().to_lowercase().as_str() {
				"true" | "1" | "yes" | "on" => Value::Bool(true),
				"false" | "0" | "no" | "off" => Value::Bool(false),
				_ => Value::String(value),
			};
		}
		if LIST_KEYS.contains(&key) {
			return Value::Array(
				value
					.split(',')
					.map(str::trim)
					.filter(|s| !s.is_empty())
					.map(|s| Value::String(s.to_string()))
					.collect(),
			);
		}
		if NUMBER_KEYS.contains(&key) {
			if let Ok(num) = value.trim().parse::<i64>() {
				return Value::Number(num.into());
			}
		}
		Value::String(value)
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars: Vec<(String, String)> = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut config = IndexMap::new();
		for (key, value) in vars {
			let Some(stripped) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let lower_key = stripped.to_lowercase();
			// The profile selector is not a setting
			if lower_key.is_empty() || lower_key == "env" {
				continue;
			}
			let parsed = Self::parse_value(&lower_key, value);
			config.insert(lower_key, parsed);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// TOML file configuration source. A missing file loads as empty.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
#[derive(Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// # Examples
	///
	/// ```
	/// use canvas::conf::sources::DefaultSource;
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new().with_value("debug", Value::Bool(false));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("CANVAS_DEBUG", "off", "debug", Value::Bool(false))]
	#[case("CANVAS_SERVE_STATIC", "yes", "serve_static", Value::Bool(true))]
	#[case("CANVAS_SHUTDOWN_TIMEOUT_SECS", "5", "shutdown_timeout_secs", Value::from(5))]
	#[case("CANVAS_BIND_ADDRESS", "0.0.0.0:9000", "bind_address", Value::from("0.0.0.0:9000"))]
	#[case("CANVAS_SITE_HEADER", "2024", "site_header", Value::from("2024"))]
	#[case("CANVAS_STATIC_DIR", "2024", "static_dir", Value::from("2024"))]
	fn test_env_values_are_typed(
		#[case] var: &str,
		#[case] raw: &str,
		#[case] key: &str,
		#[case] expected: Value,
	) {
		let source = EnvSource::new("CANVAS_").with_vars([(var, raw)]);

		let values = source.load().unwrap();

		assert_eq!(values[key], expected);
	}

	#[rstest]
	fn test_env_list_is_split_on_commas() {
		let source =
			EnvSource::new("CANVAS_").with_vars([("CANVAS_INSTALLED_APPS", "editor, management,,")]);

		let values = source.load().unwrap();

		assert_eq!(values["installed_apps"], serde_json::json!(["editor", "management"]));
	}

	#[rstest]
	fn test_env_ignores_other_prefixes_and_profile_selector() {
		let source = EnvSource::new("CANVAS_").with_vars([
			("HOME", "/root"),
			("CANVAS_ENV", "production"),
			("CANVAS_LOG_LEVEL", "debug"),
		]);

		let values = source.load().unwrap();

		assert_eq!(values.len(), 1);
		assert_eq!(values["log_level"], Value::from("debug"));
	}

	#[rstest]
	fn test_toml_missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();

		let values = TomlFileSource::new(dir.path().join("base.toml")).load().unwrap();

		assert!(values.is_empty());
	}

	#[rstest]
	fn test_toml_file_is_loaded() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("base.toml");
		fs::write(&path, "debug = false\nstatic_url = \"/assets/\"\n").unwrap();

		let values = TomlFileSource::new(&path).load().unwrap();

		assert_eq!(values["debug"], Value::Bool(false));
		assert_eq!(values["static_url"], Value::from("/assets/"));
	}

	#[rstest]
	fn test_toml_syntax_error_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("base.toml");
		fs::write(&path, "debug = = false").unwrap();

		let result = TomlFileSource::new(&path).load();

		assert!(matches!(result, Err(SourceError::Toml(_))));
	}
}
