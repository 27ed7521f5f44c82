use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use super::ShutdownCoordinator;
use crate::exception::Result;
use crate::http::{Handler, Middleware, MiddlewareChain, Request, Response};

/// HTTP server with middleware support.
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	/// # Examples
	///
	/// ```
	/// use canvas::http::{view, Request, Response};
	/// use canvas::server::HttpServer;
	///
	/// async fn hello(_request: Request) -> canvas::Result<Response> {
	///     Ok(Response::ok().with_body("Hello"))
	/// }
	///
	/// let server = HttpServer::new(view(hello));
	/// # let _ = server;
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Middleware run in the order they are added, outside the handler.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}
		Arc::new(chain)
	}

	/// Bind `addr` and serve until the process exits.
	pub async fn listen(self, addr: SocketAddr) -> Result<()> {
		let listener = TcpListener::bind(addr).await?;
		self.serve(listener).await
	}

	/// Serve connections from an already bound listener.
	pub async fn serve(self, listener: TcpListener) -> Result<()> {
		tracing::info!("listening on http://{}", listener.local_addr()?);
		let handler = self.build_handler();

		loop {
			let (stream, remote_addr) = listener.accept().await?;
			let handler = handler.clone();

			tokio::task::spawn(async move {
				if let Err(error) = Self::handle_connection(stream, remote_addr, handler, None).await {
					tracing::debug!(%remote_addr, %error, "connection error");
				}
			});
		}
	}

	/// Serve until `coordinator` signals shutdown.
	///
	/// Once signalled the listener stops accepting, open connections finish
	/// their current request and close, and anything still running after the
	/// coordinator's timeout is aborted.
	pub async fn serve_with_shutdown(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> Result<()> {
		tracing::info!("listening on http://{}", listener.local_addr()?);
		let handler = self.build_handler();
		let mut connections = JoinSet::new();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, remote_addr) = result?;
					let handler = handler.clone();
					let coordinator = coordinator.clone();

					connections.spawn(async move {
						if let Err(error) =
							Self::handle_connection(stream, remote_addr, handler, Some(coordinator)).await
						{
							tracing::debug!(%remote_addr, %error, "connection error");
						}
					});
				}
				_ = coordinator.wait() => break,
				// Reap finished connections so the set stays small
				Some(_) = connections.join_next(), if !connections.is_empty() => {}
			}
		}

		drop(listener);
		tracing::info!(open = connections.len(), "stopped accepting connections");

		let drain = async { while connections.join_next().await.is_some() {} };
		if tokio::time::timeout(coordinator.timeout(), drain).await.is_err() {
			tracing::warn!(
				open = connections.len(),
				"shutdown timeout elapsed, aborting open connections"
			);
			connections.abort_all();
		}

		tracing::info!("server stopped");
		Ok(())
	}

	async fn handle_connection(
		stream: TcpStream,
		remote_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		coordinator: Option<ShutdownCoordinator>,
	) -> std::result::Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr,
		};
		let connection = http1::Builder::new().serve_connection(io, service);

		let Some(coordinator) = coordinator else {
			return connection.await;
		};

		tokio::pin!(connection);
		tokio::select! {
			result = connection.as_mut() => result,
			_ = coordinator.wait() => {
				connection.as_mut().graceful_shutdown();
				connection.await
			}
		}
	}
}

/// Converts between hyper's types and [`Request`]/[`Response`].
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();

			let mut request = Request::new(parts.method, parts.uri, parts.version, parts.headers, body);
			request.remote_addr = Some(remote_addr);

			let response = handler.handle(request).await.unwrap_or_else(|error| {
				tracing::error!(%error, "unhandled error");
				Response::internal_server_error().with_body("Internal Server Error")
			});

			let mut hyper_response = hyper::Response::builder().status(response.status);
			if let Some(headers) = hyper_response.headers_mut() {
				headers.extend(response.headers);
			}
			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::http::view;
	use rstest::rstest;
	use std::time::Duration;

	async fn hello(request: Request) -> Result<Response> {
		Ok(Response::ok().with_body(format!("hello {}", request.path())))
	}

	#[rstest]
	#[tokio::test]
	async fn test_serves_until_shutdown() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
		let server = tokio::spawn(HttpServer::new(view(hello)).serve_with_shutdown(listener, coordinator.clone()));

		let body = reqwest::get(format!("http://{}/projects/", addr))
			.await
			.unwrap()
			.text()
			.await
			.unwrap();
		assert_eq!(body, "hello /projects/");

		coordinator.shutdown();
		tokio::time::timeout(Duration::from_secs(5), server)
			.await
			.unwrap()
			.unwrap()
			.unwrap();
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_error_becomes_500() {
		async fn broken(_request: Request) -> Result<Response> {
			Err(crate::Error::Http("boom".to_string()))
		}
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
		tokio::spawn(HttpServer::new(view(broken)).serve_with_shutdown(listener, coordinator.clone()));

		let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();

		assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
		coordinator.shutdown();
	}
}
