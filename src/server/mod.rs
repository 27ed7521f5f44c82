//! HTTP/1.1 server on hyper and tokio.

mod http;
mod shutdown;

pub use http::HttpServer;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
