use serde::Serialize;

use crate::apps::AppConfig;
use crate::exception::Result;
use crate::handler::AppState;
use crate::http::{Request, Response};
use crate::shortcuts::render_with_context;
use crate::urls::UrlEntry;

#[derive(Serialize)]
struct IndexContext<'a> {
	site_header: &'a str,
	apps: &'a [AppConfig],
	urls: Vec<UrlEntry>,
}

/// Site administration index.
pub async fn index(request: Request) -> Result<Response> {
	let state = AppState::from_request(&request)?;
	let context = IndexContext {
		site_header: &state.settings.site_header,
		apps: state.apps.get_app_configs(),
		urls: state.router.entries(),
	};
	render_with_context(&request, "admin/index.html", &context)
}
