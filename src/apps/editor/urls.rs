//! URL routing for the editor application

use crate::apps::management;
use crate::exception::Result;
use crate::http::view;
use crate::urls::{UrlRouter, path};

use super::views;

pub fn url_patterns() -> Result<UrlRouter> {
	UrlRouter::new()
		.route(path("", view(views::index))?.with_name("editor"))
		.include("", management::urls::url_patterns()?, None)
}
