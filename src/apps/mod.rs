//! Installed applications and their registry.

pub mod admin;
pub mod editor;
pub mod management;
mod registry;

pub use registry::{AppConfig, AppError, AppResult, Apps};
