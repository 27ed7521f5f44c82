use async_trait::async_trait;
use hyper::Method;
use std::sync::Arc;

use crate::exception::Result;
use crate::http::{Handler, Middleware, Request, Response};
use crate::urls::UrlRouter;

/// Django's CommonMiddleware slash handling.
///
/// A GET or HEAD for a path that matches no route, but would match with
/// a trailing slash, is answered with a permanent redirect to the slashed
/// path. The query string is kept.
pub struct CommonMiddleware {
	router: Arc<UrlRouter>,
	append_slash: bool,
}

impl CommonMiddleware {
	pub fn new(router: Arc<UrlRouter>, append_slash: bool) -> Self {
		Self {
			router,
			append_slash,
		}
	}

	/// Where to redirect `request`, if anywhere.
	fn slash_redirect(&self, request: &Request) -> Option<String> {
		let path = request.path();
		if path.ends_with('/') || self.router.resolve(path).is_some() {
			return None;
		}

		let with_slash = format!("{}/", path);
		self.router.resolve(&with_slash)?;

		Some(match request.query_string() {
			Some(query) => format!("{}?{}", with_slash, query),
			None => with_slash,
		})
	}
}

#[async_trait]
impl Middleware for CommonMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		if let Some(location) = self.slash_redirect(&request) {
			tracing::debug!(path = request.path(), %location, "appending slash");
			return Ok(Response::permanent_redirect(location));
		}
		next.handle(request).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		self.append_slash && (request.method == Method::GET || request.method == Method::HEAD)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::http::{MiddlewareChain, view};
	use crate::urls::path;
	use hyper::StatusCode;
	use rstest::{fixture, rstest};

	async fn ok(request: Request) -> Result<Response> {
		Ok(Response::ok().with_body(request.path().to_string()))
	}

	#[fixture]
	fn router() -> Arc<UrlRouter> {
		Arc::new(
			UrlRouter::new()
				.route(path("login/", view(ok)).unwrap())
				.route(path("raw", view(ok)).unwrap()),
		)
	}

	fn chain(router: Arc<UrlRouter>, append_slash: bool) -> MiddlewareChain {
		let inner: Arc<dyn Handler> = router.clone();
		MiddlewareChain::new(inner).with_middleware(Arc::new(CommonMiddleware::new(router, append_slash)))
	}

	#[rstest]
	#[case("/login", "/login/")]
	#[case("/login?next=%2Fprojects%2F", "/login/?next=%2Fprojects%2F")]
	#[tokio::test]
	async fn test_redirects_to_slashed_path(
		router: Arc<UrlRouter>,
		#[case] uri: &str,
		#[case] location: &str,
	) {
		let response = chain(router, true)
			.handle(Request::builder().uri(uri).build())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
		assert_eq!(response.headers.get("location").unwrap(), location);
	}

	#[rstest]
	#[tokio::test]
	async fn test_existing_unslashed_route_is_served(router: Arc<UrlRouter>) {
		let response = chain(router, true)
			.handle(Request::builder().uri("/raw").build())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
	}

	#[rstest]
	#[tokio::test]
	async fn test_no_redirect_when_slashed_path_is_unknown(router: Arc<UrlRouter>) {
		let result = chain(router, true)
			.handle(Request::builder().uri("/nowhere").build())
			.await;

		assert!(matches!(result, Err(crate::Error::NotFound { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_post_is_not_redirected(router: Arc<UrlRouter>) {
		let result = chain(router, true)
			.handle(Request::builder().method(Method::POST).uri("/login").build())
			.await;

		assert!(matches!(result, Err(crate::Error::NotFound { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_disabled(router: Arc<UrlRouter>) {
		let result = chain(router, false)
			.handle(Request::builder().uri("/login").build())
			.await;

		assert!(matches!(result, Err(crate::Error::NotFound { .. })));
	}
}
