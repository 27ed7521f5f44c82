use std::fmt;
use std::sync::Arc;

use super::PathPattern;
use crate::exception::Result;
use crate::http::Handler;

/// A URL pattern bound to a handler, optionally named for `reverse()`.
/// Similar to Django's URLPattern.
#[derive(Clone)]
pub struct Route {
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
	/// Namespace for this route (e.g. "admin"); nested includes join with `:`.
	pub namespace: Option<String>,
}

impl Route {
	/// Create a new route
	///
	/// # Examples
	///
	/// ```
	/// use canvas::urls::Route;
	/// use canvas::http::{view, Request, Response};
	///
	/// async fn login(_request: Request) -> canvas::Result<Response> {
	///     Ok(Response::ok())
	/// }
	///
	/// let route = Route::new("login/", view(login)).unwrap().with_name("login");
	/// assert_eq!(route.pattern(), "login/");
	/// assert_eq!(route.full_name(), Some("login".to_string()));
	/// ```
	pub fn new(pattern: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		Ok(Self {
			pattern: PathPattern::new(pattern)?,
			handler,
			name: None,
			namespace: None,
		})
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	pub(crate) fn path_pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		self.handler.clone()
	}

	/// `namespace:name`, or just `name` when there is no namespace.
	pub fn full_name(&self) -> Option<String> {
		let name = self.name.as_ref()?;
		Some(match &self.namespace {
			Some(ns) => format!("{}:{}", ns, name),
			None => name.clone(),
		})
	}

	/// Re-root this route under `prefix`, pushing `namespace` in front of
	/// any namespace it already has.
	pub(crate) fn prefixed(self, prefix: &str, namespace: Option<&str>) -> Result<Self> {
		let prefix = prefix.trim_start_matches('/');
		let joined = format!("{}{}", prefix, self.pattern.as_str());
		let namespace = match (namespace, self.namespace) {
			(Some(outer), Some(inner)) => Some(format!("{}:{}", outer, inner)),
			(Some(outer), None) => Some(outer.to_string()),
			(None, inner) => inner,
		};
		Ok(Self {
			pattern: PathPattern::new(&joined)?,
			handler: self.handler,
			name: self.name,
			namespace,
		})
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern.as_str())
			.field("name", &self.name)
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

/// Shorthand for [`Route::new`], mirroring Django's `path()`.
pub fn path(pattern: &str, handler: Arc<dyn Handler>) -> Result<Route> {
	Route::new(pattern, handler)
}
