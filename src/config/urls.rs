//! Root URL configuration
//!
//! `url_patterns` routes URLs to the installed apps' URL tables.

use std::sync::Arc;

use crate::apps::{Apps, admin, editor};
use crate::conf::Settings;
use crate::exception::Result;
use crate::staticfiles::StaticFilesHandler;
use crate::urls::{UrlRouter, path};

pub fn url_patterns(settings: &Settings, apps: &Apps) -> Result<UrlRouter> {
	let mut router = UrlRouter::new();

	if apps.is_installed("editor") {
		router = router.include("", editor::urls::url_patterns()?, None)?;
	}
	if apps.is_installed("admin") {
		router = router.include("admin/", admin::urls::url_patterns()?, Some("admin"))?;
	}
	if settings.serves_static() && apps.is_installed("staticfiles") {
		let prefix = settings.static_url.trim_start_matches('/');
		let handler = Arc::new(StaticFilesHandler::new(&settings.static_dir));
		router.add_route(path(&format!("{}{{path:path}}", prefix), handler)?.with_name("static"));
	}

	Ok(router)
}
