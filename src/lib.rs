//! # canvas
//!
//! The web front end of the Canvas 3D editor: the editor page, account and
//! project pages, and a read-only admin index, served by a small
//! Django-style stack on hyper and tera.
//!
//! ```no_run
//! use canvas::conf::Settings;
//! use canvas::handler::Application;
//! use canvas::server::HttpServer;
//! use std::sync::Arc;
//!
//! # async fn example() -> canvas::Result<()> {
//! let settings = Settings::default();
//! let addr = settings.socket_addr().expect("valid address");
//! let app = Arc::new(Application::new(settings)?);
//! HttpServer::new(app).listen(addr).await?;
//! # Ok(())
//! # }
//! ```

pub mod apps;
pub mod commands;
pub mod conf;
pub mod config;
pub mod exception;
pub mod handler;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod shortcuts;
pub mod staticfiles;
pub mod template;
pub mod urls;

pub use exception::{Error, Result};
