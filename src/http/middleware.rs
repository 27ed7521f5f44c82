//! Handler and middleware traits for HTTP request processing.
//!
//! ```rust
//! use canvas::http::{Handler, Middleware, Request, Response};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct PoweredBy;
//!
//! #[async_trait]
//! impl Middleware for PoweredBy {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> canvas::Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("X-Powered-By", "canvas"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use super::{Request, Response};
use crate::exception::Result;

/// Handler trait for processing requests.
///
/// This is the core abstraction: views, routers, and the static file
/// handler all implement it.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation so `Arc<dyn Handler>` is itself a Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for the given request. Defaults to always.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware around a handler.
///
/// Middleware run in the order they were added: the first one added sees
/// the request first and the response last.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Wrap from the innermost outwards, skipping middleware that opt out
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

/// Adapts an async function into a [`Handler`].
///
/// This is how function views are registered on a router.
pub struct FnHandler<F> {
	func: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

/// Wrap an async fn view as a shareable handler.
///
/// # Examples
///
/// ```
/// use canvas::http::{view, Request, Response};
///
/// async fn ping(_request: Request) -> canvas::Result<Response> {
///     Ok(Response::ok().with_body("pong"))
/// }
///
/// let handler = view(ping);
/// # let _ = handler;
/// ```
pub fn view<F, Fut>(func: F) -> Arc<dyn Handler>
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Arc::new(FnHandler { func })
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct MockHandler {
		response_body: String,
	}

	#[async_trait]
	impl Handler for MockHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(self.response_body.clone()))
		}
	}

	struct PrefixMiddleware {
		prefix: String,
	}

	#[async_trait]
	impl Middleware for PrefixMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = format!("{}{}", self.prefix, response.text());
			Ok(Response::ok().with_body(body))
		}
	}

	struct AdminOnlyMiddleware;

	#[async_trait]
	impl Middleware for AdminOnlyMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			Ok(response.with_header("X-Admin", "1"))
		}

		fn should_continue(&self, request: &Request) -> bool {
			request.path().starts_with("/admin/")
		}
	}

	fn handler() -> Arc<dyn Handler> {
		Arc::new(MockHandler {
			response_body: "body".to_string(),
		})
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_chain_calls_handler() {
		let chain = MiddlewareChain::new(handler());

		let response = chain.handle(Request::builder().build()).await.unwrap();

		assert_eq!(response.text(), "body");
	}

	#[rstest]
	#[tokio::test]
	async fn test_middleware_runs_in_insertion_order() {
		let chain = MiddlewareChain::new(handler())
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "outer-".to_string(),
			}))
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "inner-".to_string(),
			}));

		let response = chain.handle(Request::builder().build()).await.unwrap();

		// The inner middleware prefixes first, then the outer one
		assert_eq!(response.text(), "outer-inner-body");
	}

	#[rstest]
	#[case("/admin/", true)]
	#[case("/login/", false)]
	#[tokio::test]
	async fn test_should_continue_skips_middleware(#[case] path: &str, #[case] expect_header: bool) {
		let mut chain = MiddlewareChain::new(handler());
		chain.add_middleware(Arc::new(AdminOnlyMiddleware));

		let response = chain
			.handle(Request::builder().uri(path).build())
			.await
			.unwrap();

		assert_eq!(response.headers.contains_key("x-admin"), expect_header);
	}

	#[rstest]
	#[tokio::test]
	async fn test_fn_handler_invokes_function() {
		async fn echo_path(request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(request.path().to_string()))
		}

		let handler = view(echo_path);
		let response = handler
			.handle(Request::builder().uri("/projects/").build())
			.await
			.unwrap();

		assert_eq!(response.text(), "/projects/");
	}
}
