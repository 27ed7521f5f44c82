//! URL routing for the management application

use crate::exception::Result;
use crate::http::view;
use crate::urls::{UrlRouter, path};

use super::views;

pub fn url_patterns() -> Result<UrlRouter> {
	Ok(UrlRouter::new()
		.route(path("login/", view(views::login))?.with_name("login"))
		.route(path("register/", view(views::register))?.with_name("register"))
		.route(path("projects/", view(views::projects))?.with_name("projects")))
}
