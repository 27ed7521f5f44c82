//! management application
//!
//! Account pages and the project list.

use crate::apps::AppConfig;

pub mod models;
pub mod urls;
pub mod views;

pub fn app_config() -> AppConfig {
	AppConfig::new("canvas.apps.management", "management").with_verbose_name("Management")
}
