//! URL routing for the admin application

use crate::exception::Result;
use crate::http::view;
use crate::urls::{UrlRouter, path};

use super::views;

/// Mount under `admin/` with the `admin` namespace.
pub fn url_patterns() -> Result<UrlRouter> {
	Ok(UrlRouter::new().route(path("", view(views::index))?.with_name("index")))
}
