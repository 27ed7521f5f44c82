use bytes::Bytes;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};

/// Template name and context a response was rendered from.
///
/// Kept on the response so tests can assert which template a view used and
/// what it was given, without parsing HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
	pub name: String,
	pub context: serde_json::Value,
}

/// HTTP response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	template: Option<RenderedTemplate>,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use canvas::http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			template: None,
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Create a Response with HTTP 301 Moved Permanently
	///
	/// # Examples
	///
	/// ```
	/// use canvas::http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::permanent_redirect("/login/");
	/// assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
	/// assert_eq!(response.headers.get("location").unwrap(), "/login/");
	/// ```
	pub fn permanent_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::MOVED_PERMANENTLY).with_location(location.as_ref())
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header; invalid names or values are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::http::Response;
	///
	/// let response = Response::ok().with_header("X-Frame-Options", "DENY");
	/// assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	pub fn with_content_type(mut self, content_type: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(content_type) {
			self.headers.insert(header::CONTENT_TYPE, value);
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(header::LOCATION, value);
		}
		self
	}

	pub(crate) fn with_template(mut self, template: RenderedTemplate) -> Self {
		self.template = Some(template);
		self
	}

	/// The template this response was rendered from, if any.
	pub fn template(&self) -> Option<&RenderedTemplate> {
		self.template.as_ref()
	}

	pub fn template_name(&self) -> Option<&str> {
		self.template.as_ref().map(|t| t.name.as_str())
	}

	/// Context passed to the template, if the response came from one.
	pub fn context(&self) -> Option<&serde_json::Value> {
		self.template.as_ref().map(|t| &t.context)
	}

	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
	}

	/// Body decoded as UTF-8, lossily.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
