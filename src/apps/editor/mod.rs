//! editor application
//!
//! Hosts the browser-side 3D editor page and mounts the management pages.

use crate::apps::AppConfig;

pub mod urls;
pub mod views;

pub fn app_config() -> AppConfig {
	AppConfig::new("canvas.apps.editor", "editor").with_verbose_name("Editor")
}
