//! Template rendering shortcut functions
//!
//! Similar to Django's `render()`: look up the template engine for the
//! current request, render, and wrap the HTML in a 200 response.

use hyper::StatusCode;
use serde::Serialize;

use crate::exception::{Error, Result};
use crate::handler::AppState;
use crate::http::{RenderedTemplate, Request, Response};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Render a template with an empty context.
///
/// # Errors
///
/// - [`Error::TemplateDoesNotExist`] when the template is unknown
/// - [`Error::TemplateRender`] when rendering fails
/// - [`Error::ImproperlyConfigured`] when the request carries no [`AppState`]
pub fn render(request: &Request, template_name: &str) -> Result<Response> {
	render_with_status(request, template_name, &serde_json::json!({}), StatusCode::OK)
}

/// Render a template with the given context.
pub fn render_with_context<C: Serialize>(
	request: &Request,
	template_name: &str,
	context: &C,
) -> Result<Response> {
	render_with_status(request, template_name, context, StatusCode::OK)
}

/// Render a template into a response with a custom status code.
pub fn render_with_status<C: Serialize>(
	request: &Request,
	template_name: &str,
	context: &C,
	status: StatusCode,
) -> Result<Response> {
	let state = AppState::from_request(request)?;
	let context = serde_json::to_value(context)
		.map_err(|e| Error::TemplateRender(format!("context for {}: {}", template_name, e)))?;

	let html = state.templates.render(template_name, &context)?;

	Ok(Response::new(status)
		.with_content_type(HTML_CONTENT_TYPE)
		.with_body(html)
		.with_template(RenderedTemplate {
			name: template_name.to_string(),
			context,
		}))
}
