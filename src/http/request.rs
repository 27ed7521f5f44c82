use bytes::Bytes;
use hyper::http::Extensions;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;
use std::net::SocketAddr;

/// HTTP request as seen by views and middleware.
///
/// The body is fully buffered; views here never stream uploads.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
	/// Values captured by `{name}` placeholders of the matched route.
	pub path_params: HashMap<String, String>,
	/// Request-scoped shared state (see [`crate::handler::AppState`]).
	pub extensions: Extensions,
}

impl Request {
	/// Create a request from its raw parts.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/projects/?sort=name"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/projects/");
	/// assert_eq!(request.query_string(), Some("sort=name"));
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			path_params: HashMap::new(),
			extensions: Extensions::new(),
		}
	}

	/// Start building a request; defaults to `GET /` over HTTP/1.1.
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	pub fn query_string(&self) -> Option<&str> {
		self.uri.query()
	}

	/// Captured route parameter by name.
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}
}

/// Builder for [`Request`], mostly used by tests and the test client.
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: Uri,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: Uri::from_static("/"),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			remote_addr: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the request URI. An unparsable URI leaves the previous value in place.
	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		if let Ok(uri) = uri.as_ref().parse::<Uri>() {
			self.uri = uri;
		}
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Request {
		let mut request = Request::new(self.method, self.uri, self.version, self.headers, self.body);
		request.remote_addr = self.remote_addr;
		request
	}
}
