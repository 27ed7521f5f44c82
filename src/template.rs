//! Tera-backed template engine.
//!
//! Templates are looked up in the project's template directory first; any
//! name not found there falls back to the copy compiled into the binary, so
//! a deployment can override individual pages without shipping all of them.

use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use crate::conf::Settings;
use crate::exception::{Error, Result};

/// Templates compiled into the binary.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
	("base.html", include_str!("../templates/base.html")),
	(
		"management/login.html",
		include_str!("../templates/management/login.html"),
	),
	(
		"management/register.html",
		include_str!("../templates/management/register.html"),
	),
	(
		"management/projects.html",
		include_str!("../templates/management/projects.html"),
	),
	("editor/index.html", include_str!("../templates/editor/index.html")),
	("admin/index.html", include_str!("../templates/admin/index.html")),
	("errors/404.html", include_str!("../templates/errors/404.html")),
	("errors/500.html", include_str!("../templates/errors/500.html")),
];

pub struct TemplateEngine {
	tera: Tera,
	globals: Context,
}

impl TemplateEngine {
	/// Engine with only the built-in templates.
	pub fn builtin() -> Result<Self> {
		let mut tera = Tera::default();
		tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())?;
		Ok(Self {
			tera,
			globals: Context::new(),
		})
	}

	/// Load `**/*.html` from `dir`, falling back to built-ins for missing names.
	///
	/// A missing directory is not an error; the built-ins are used alone.
	pub fn from_dir(dir: &Path) -> Result<Self> {
		let builtin = Self::builtin()?;
		if !dir.is_dir() {
			tracing::debug!(dir = %dir.display(), "template directory absent, using built-in templates");
			return Ok(builtin);
		}

		let glob = dir.join("**").join("*.html");
		let glob = glob.to_str().ok_or_else(|| {
			Error::ImproperlyConfigured(format!(
				"template directory is not valid UTF-8: {}",
				dir.display()
			))
		})?;
		// Parse without building inheritance: a project template may extend a
		// built-in one that only exists after `extend`
		let mut tera = Tera::parse(glob)?;
		tera.extend(&builtin.tera)?;

		tracing::debug!(
			dir = %dir.display(),
			count = tera.get_template_names().count(),
			"loaded templates"
		);
		Ok(Self {
			tera,
			globals: Context::new(),
		})
	}

	/// Build the engine for a project, with `static_url` and `debug` available
	/// to every template.
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		Ok(Self::from_dir(&settings.template_dir)?
			.with_global("static_url", &settings.static_url)
			.with_global("debug", &settings.debug))
	}

	/// Add a variable visible to every render. View context takes precedence.
	pub fn with_global<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
		self.globals.insert(key, value);
		self
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}

	pub fn template_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.tera.get_template_names().map(str::to_string).collect();
		names.sort();
		names
	}

	/// Render `name` with a JSON object (or `null`) as context.
	pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
		if !self.has_template(name) {
			return Err(Error::TemplateDoesNotExist(name.to_string()));
		}

		let mut tera_context = self.globals.clone();
		match context {
			serde_json::Value::Null => {}
			serde_json::Value::Object(_) => tera_context.extend(Context::from_value(context.clone())?),
			_ => {
				return Err(Error::TemplateRender(format!(
					"context for {} must be an object",
					name
				)));
			}
		}

		Ok(self.tera.render(name, &tera_context)?)
	}
}
