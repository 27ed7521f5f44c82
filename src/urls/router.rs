use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use super::Route;
use crate::exception::{Error, Result};
use crate::http::{Handler, Request, Response};

/// One row of the resolved URL table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlEntry {
	/// Absolute pattern, e.g. `/admin/`.
	pub pattern: String,
	pub name: Option<String>,
}

/// Ordered URL table. The first route whose pattern matches wins.
/// Similar to Django's URLResolver.
#[derive(Debug, Clone, Default)]
pub struct UrlRouter {
	routes: Vec<Route>,
}

impl UrlRouter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a route (builder style).
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	pub fn add_route(&mut self, route: Route) {
		self.routes.push(route);
	}

	/// Mount every route of `other` under `prefix`, like Django's `include()`.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::urls::{path, UrlRouter};
	/// use canvas::http::{view, Request, Response};
	///
	/// async fn index(_request: Request) -> canvas::Result<Response> {
	///     Ok(Response::ok())
	/// }
	///
	/// let app = UrlRouter::new().route(path("", view(index)).unwrap().with_name("index"));
	/// let root = UrlRouter::new().include("admin/", app, Some("admin")).unwrap();
	///
	/// assert_eq!(root.reverse("admin:index", &[]).unwrap(), "/admin/");
	/// ```
	pub fn include(mut self, prefix: &str, other: UrlRouter, namespace: Option<&str>) -> Result<Self> {
		for route in other.routes {
			self.routes.push(route.prefixed(prefix, namespace)?);
		}
		Ok(self)
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Resolve an absolute path to its route and captured parameters.
	pub fn resolve(&self, path: &str) -> Option<(&Route, HashMap<String, String>)> {
		self.routes
			.iter()
			.find_map(|route| route.path_pattern().matches(path).map(|params| (route, params)))
	}

	/// Build the path of a named route, like Django's `reverse()`.
	///
	/// `name` may be namespaced (`"admin:index"`).
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
		let params: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		let mut last_error = None;
		for route in self
			.routes
			.iter()
			.filter(|r| r.full_name().as_deref() == Some(name))
		{
			match route.path_pattern().expand(&params) {
				Ok(path) => return Ok(path),
				Err(e) => last_error = Some(e),
			}
		}
		Err(last_error.unwrap_or_else(|| Error::NoReverseMatch(name.to_string())))
	}

	/// The URL table as absolute patterns with their full names.
	pub fn entries(&self) -> Vec<UrlEntry> {
		self.routes
			.iter()
			.map(|route| UrlEntry {
				pattern: format!("/{}", route.pattern()),
				name: route.full_name(),
			})
			.collect()
	}
}

#[async_trait]
impl Handler for UrlRouter {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let Some((route, params)) = self.resolve(request.path()) else {
			return Err(Error::NotFound {
				path: request.path().to_string(),
				tried: self.entries().into_iter().map(|e| e.pattern).collect(),
			});
		};

		tracing::debug!(
			path = request.path(),
			pattern = route.pattern(),
			name = route.full_name().as_deref().unwrap_or(""),
			"resolved route"
		);
		request.path_params = params;
		route.handler().handle(request).await
	}
}
