use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::exception::Result;
use crate::http::{Handler, Middleware, Request, Response};

/// Logs each request with its method, path, status code and duration.
pub struct RequestLoggingMiddleware;

impl RequestLoggingMiddleware {
	pub fn new() -> Self {
		Self
	}
}

impl Default for RequestLoggingMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for RequestLoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Instant::now();
		let method = request.method.to_string();
		let path = request.path().to_string();

		let result = next.handle(request).await;

		let elapsed_ms = start.elapsed().as_millis() as u64;
		match &result {
			Ok(response) if response.status.is_server_error() => {
				tracing::error!(%method, %path, status = response.status.as_u16(), elapsed_ms, "request");
			}
			Ok(response) if response.status.is_client_error() => {
				tracing::warn!(%method, %path, status = response.status.as_u16(), elapsed_ms, "request");
			}
			Ok(response) => {
				tracing::info!(%method, %path, status = response.status.as_u16(), elapsed_ms, "request");
			}
			Err(err) => {
				tracing::error!(%method, %path, error = %err, elapsed_ms, "request failed");
			}
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::exception::Error;
	use crate::http::view;
	use hyper::StatusCode;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_passes_response_through() {
		async fn ok(_request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("OK"))
		}
		let middleware = RequestLoggingMiddleware::new();

		let response = middleware
			.process(Request::builder().uri("/projects/").build(), view(ok))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.text(), "OK");
	}

	#[rstest]
	#[tokio::test]
	async fn test_passes_error_through() {
		async fn missing(request: Request) -> Result<Response> {
			Err(Error::NotFound {
				path: request.path().to_string(),
				tried: Vec::new(),
			})
		}
		let middleware = RequestLoggingMiddleware::default();

		let result = middleware
			.process(Request::builder().uri("/nowhere").build(), view(missing))
			.await;

		assert!(matches!(result, Err(Error::NotFound { .. })));
	}
}
