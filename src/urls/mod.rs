//! URL dispatch: patterns, routes, `include()` and `reverse()`.

mod pattern;
mod route;
mod router;

pub use pattern::PathPattern;
pub use route::{Route, path};
pub use router::{UrlEntry, UrlRouter};
