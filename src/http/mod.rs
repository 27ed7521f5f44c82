//! Request, response and the handler/middleware abstractions.

mod middleware;
mod request;
mod response;

pub use middleware::{FnHandler, Handler, Middleware, MiddlewareChain, view};
pub use request::{Request, RequestBuilder};
pub use response::{RenderedTemplate, Response};
