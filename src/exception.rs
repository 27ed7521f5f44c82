//! Error types shared by handlers, routing and template rendering.

use thiserror::Error;

/// Result type used across the request/response cycle.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while a request is being handled.
///
/// Handlers return these instead of building error responses themselves;
/// [`crate::handler::Application`] turns them into error pages.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// No URL pattern matched the request path.
	#[error("no route matches {path}")]
	NotFound {
		/// The request path that failed to resolve.
		path: String,
		/// Patterns tried, in resolution order.
		tried: Vec<String>,
	},

	/// The route exists but refuses this HTTP method.
	#[error("method {method} not allowed")]
	MethodNotAllowed {
		/// Rejected method.
		method: String,
		/// Methods the route accepts.
		allowed: Vec<String>,
	},

	/// The named template is not known to the engine.
	#[error("template does not exist: {0}")]
	TemplateDoesNotExist(String),

	/// The template exists but failed to render.
	#[error("template rendering failed: {0}")]
	TemplateRender(String),

	/// `reverse()` could not build a URL for the given name and arguments.
	#[error("reverse for '{0}' not found")]
	NoReverseMatch(String),

	/// The project is wired up incorrectly (missing state, bad settings).
	#[error("improperly configured: {0}")]
	ImproperlyConfigured(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("HTTP error: {0}")]
	Http(String),
}

impl Error {
	/// HTTP status code this error maps to.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::exception::Error;
	///
	/// let err = Error::NotFound { path: "/missing/".to_string(), tried: vec![] };
	/// assert_eq!(err.status_code(), 404);
	/// assert_eq!(Error::TemplateDoesNotExist("x.html".to_string()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::NotFound { .. } => 404,
			Error::MethodNotAllowed { .. } => 405,
			_ => 500,
		}
	}
}

impl From<tera::Error> for Error {
	fn from(error: tera::Error) -> Self {
		match &error.kind {
			tera::ErrorKind::TemplateNotFound(name) => Error::TemplateDoesNotExist(name.clone()),
			_ => Error::TemplateRender(render_error_chain(&error)),
		}
	}
}

impl From<hyper::http::Error> for Error {
	fn from(error: hyper::http::Error) -> Self {
		Error::Http(error.to_string())
	}
}

// Tera nests the useful message in `source()`; flatten the chain for logs.
fn render_error_chain(error: &tera::Error) -> String {
	let mut message = error.to_string();
	let mut source = std::error::Error::source(error);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::NotFound { path: "/x".into(), tried: vec![] }, 404)]
	#[case(Error::MethodNotAllowed { method: "POST".into(), allowed: vec!["GET".into()] }, 405)]
	#[case(Error::TemplateDoesNotExist("a.html".into()), 500)]
	#[case(Error::TemplateRender("boom".into()), 500)]
	#[case(Error::ImproperlyConfigured("state".into()), 500)]
	fn test_status_code_mapping(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_tera_missing_template_maps_to_template_does_not_exist() {
		let tera = tera::Tera::default();
		let err = tera
			.render("missing.html", &tera::Context::new())
			.unwrap_err();

		let converted = Error::from(err);

		assert!(matches!(converted, Error::TemplateDoesNotExist(name) if name == "missing.html"));
	}
}
