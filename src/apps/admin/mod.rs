//! admin application
//!
//! A read-only site index: installed applications and the URL table.

use crate::apps::AppConfig;

pub mod urls;
pub mod views;

pub fn app_config() -> AppConfig {
	AppConfig::new("canvas.apps.admin", "admin").with_verbose_name("Administration")
}
