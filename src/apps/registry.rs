//! # Application Registry
//!
//! Django-style installed-app configuration. Each app module exposes an
//! [`AppConfig`]; settings select which of them are installed.

use serde::Serialize;
use thiserror::Error as ThisError;

use crate::exception::Error;

/// Errors that can occur when working with the application registry
#[derive(Debug, ThisError)]
pub enum AppError {
	#[error("Application not found: {0}")]
	NotFound(String),

	#[error("Invalid application label: {0}")]
	InvalidLabel(String),

	#[error("Duplicate application label: {0}")]
	DuplicateLabel(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<AppError> for Error {
	fn from(error: AppError) -> Self {
		Error::ImproperlyConfigured(error.to_string())
	}
}

/// Configuration for a single application
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppConfig {
	/// Module path of the application (e.g. "canvas.apps.management")
	pub name: String,

	/// The short label for the application (e.g. "management")
	pub label: String,

	/// Human-readable name for the application
	pub verbose_name: Option<String>,
}

impl AppConfig {
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			verbose_name: None,
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	/// Display name: the verbose name, or the label.
	pub fn display_name(&self) -> &str {
		self.verbose_name.as_deref().unwrap_or(&self.label)
	}

	/// Labels must be valid identifiers: ASCII letters, digits and `_`, not
	/// starting with a digit.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::apps::AppConfig;
	///
	/// assert!(AppConfig::new("canvas.apps.editor", "editor").validate_label().is_ok());
	/// assert!(AppConfig::new("x", "2d-editor").validate_label().is_err());
	/// ```
	pub fn validate_label(&self) -> AppResult<()> {
		let label = &self.label;
		let valid = !label.is_empty()
			&& label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
			&& !label.starts_with(|c: char| c.is_ascii_digit());
		if valid {
			Ok(())
		} else {
			Err(AppError::InvalidLabel(label.clone()))
		}
	}
}

/// The populated application registry
#[derive(Clone, Debug, Default)]
pub struct Apps {
	configs: Vec<AppConfig>,
}

impl Apps {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an app. Labels are validated and must be unique.
	pub fn register(&mut self, config: AppConfig) -> AppResult<()> {
		config.validate_label()?;
		if self.is_installed(&config.label) {
			return Err(AppError::DuplicateLabel(config.label));
		}
		self.configs.push(config);
		Ok(())
	}

	/// Build the registry from installed labels, picking each label's config
	/// out of `available`. Order follows `installed`.
	pub fn populate(installed: &[String], available: &[AppConfig]) -> AppResult<Self> {
		let mut apps = Self::new();
		for label in installed {
			let config = available
				.iter()
				.find(|c| &c.label == label)
				.ok_or_else(|| AppError::NotFound(label.clone()))?;
			apps.register(config.clone())?;
		}
		Ok(apps)
	}

	pub fn get_app_config(&self, label: &str) -> AppResult<&AppConfig> {
		self.configs
			.iter()
			.find(|c| c.label == label)
			.ok_or_else(|| AppError::NotFound(label.to_string()))
	}

	pub fn get_app_configs(&self) -> &[AppConfig] {
		&self.configs
	}

	pub fn is_installed(&self, label: &str) -> bool {
		self.configs.iter().any(|c| c.label == label)
	}
}
