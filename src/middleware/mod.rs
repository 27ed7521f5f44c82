//! Project middleware.

mod common;
mod logging;

pub use common::CommonMiddleware;
pub use logging::RequestLoggingMiddleware;
