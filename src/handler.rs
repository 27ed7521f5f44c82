//! The project's root handler: shared state, middleware and error pages.

use async_trait::async_trait;
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;

use crate::apps::Apps;
use crate::conf::Settings;
use crate::config;
use crate::exception::{Error, Result};
use crate::http::{Handler, MiddlewareChain, Request, Response};
use crate::middleware::{CommonMiddleware, RequestLoggingMiddleware};
use crate::shortcuts::render_with_status;
use crate::template::TemplateEngine;
use crate::urls::UrlRouter;

/// State shared by every request, immutable after startup.
#[derive(Clone)]
pub struct AppState {
	pub settings: Arc<Settings>,
	pub templates: Arc<TemplateEngine>,
	pub apps: Arc<Apps>,
	pub router: Arc<UrlRouter>,
}

impl AppState {
	/// Populate the app registry, load templates and build the URL table.
	pub fn new(settings: Settings) -> Result<Self> {
		let apps = Apps::populate(&settings.installed_apps, &config::available_apps())?;
		let templates = TemplateEngine::from_settings(&settings)?;
		let router = config::urls::url_patterns(&settings, &apps)?;

		Ok(Self {
			settings: Arc::new(settings),
			templates: Arc::new(templates),
			apps: Arc::new(apps),
			router: Arc::new(router),
		})
	}

	/// The state attached to a request by [`Application`].
	pub fn from_request(request: &Request) -> Result<Self> {
		request.extensions.get::<AppState>().cloned().ok_or_else(|| {
			Error::ImproperlyConfigured("request has no application state attached".to_string())
		})
	}

	/// Attach this state to a request.
	pub fn attach(&self, mut request: Request) -> Request {
		request.extensions.insert(self.clone());
		request
	}
}

/// Turns handler errors into error pages, like Django's response-for-exception.
pub struct ErrorPages {
	inner: Arc<dyn Handler>,
}

impl ErrorPages {
	pub fn new(inner: Arc<dyn Handler>) -> Self {
		Self { inner }
	}

	fn not_found(request: &Request, state: &AppState, path: &str, tried: &[String]) -> Response {
		tracing::warn!(path, "Not Found");
		let tried: &[String] = if state.settings.debug { tried } else { &[] };
		let context = json!({
			"request_path": path,
			"tried": tried,
		});
		render_with_status(request, "errors/404.html", &context, StatusCode::NOT_FOUND)
			.unwrap_or_else(|_| Response::not_found().with_body("Not Found"))
	}

	fn server_error(request: &Request, state: &AppState, error: &Error) -> Response {
		tracing::error!(path = request.path(), error = %error, "Internal Server Error");
		let detail = state.settings.debug.then(|| error.to_string());
		let context = json!({
			"request_path": request.path(),
			"error": detail,
		});
		render_with_status(
			request,
			"errors/500.html",
			&context,
			StatusCode::INTERNAL_SERVER_ERROR,
		)
		.unwrap_or_else(|_| Response::internal_server_error().with_body("Internal Server Error"))
	}
}

#[async_trait]
impl Handler for ErrorPages {
	async fn handle(&self, request: Request) -> Result<Response> {
		let state = AppState::from_request(&request)?;
		// Keep what the error page needs; the request itself moves into the handler
		let error_request = state.attach(
			Request::builder()
				.method(request.method.clone())
				.uri(request.uri.to_string())
				.build(),
		);

		match self.inner.handle(request).await {
			Ok(response) => Ok(response),
			Err(Error::NotFound { path, tried }) => {
				Ok(Self::not_found(&error_request, &state, &path, &tried))
			}
			Err(Error::MethodNotAllowed { method, allowed }) => {
				tracing::warn!(path = error_request.path(), method = %method, "Method Not Allowed");
				Ok(Response::method_not_allowed()
					.with_header("Allow", &allowed.join(", "))
					.with_body("Method Not Allowed"))
			}
			Err(error) => Ok(Self::server_error(&error_request, &state, &error)),
		}
	}
}

/// Root handler served by [`crate::server::HttpServer`].
///
/// Attaches [`AppState`] to each request, then runs the middleware stack
/// around the URL router.
pub struct Application {
	state: AppState,
	handler: Arc<dyn Handler>,
}

impl Application {
	/// # Examples
	///
	/// ```
	/// use canvas::conf::Settings;
	/// use canvas::handler::Application;
	///
	/// let app = Application::new(Settings::default()).unwrap();
	/// assert!(app.state().router.reverse("projects", &[]).is_ok());
	/// ```
	pub fn new(settings: Settings) -> Result<Self> {
		let state = AppState::new(settings)?;
		let router: Arc<dyn Handler> = state.router.clone();

		let handler = MiddlewareChain::new(Arc::new(ErrorPages::new(router)))
			.with_middleware(Arc::new(RequestLoggingMiddleware::new()))
			.with_middleware(Arc::new(CommonMiddleware::new(
				state.router.clone(),
				state.settings.append_slash,
			)));

		Ok(Self {
			state,
			handler: Arc::new(handler),
		})
	}

	pub fn state(&self) -> &AppState {
		&self.state
	}
}

#[async_trait]
impl Handler for Application {
	async fn handle(&self, request: Request) -> Result<Response> {
		let request = self.state.attach(request);
		self.handler.handle(request).await
	}
}
