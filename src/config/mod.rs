//! Project configuration: installed apps, settings and the root URL table.

use crate::apps::{AppConfig, admin, editor, management};

pub mod settings;
pub mod urls;

/// Every application this project can install, by label.
pub fn available_apps() -> Vec<AppConfig> {
	vec![
		editor::app_config(),
		management::app_config(),
		admin::app_config(),
		AppConfig::new("canvas.staticfiles", "staticfiles").with_verbose_name("Static Files"),
	]
}
