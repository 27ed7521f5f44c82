//! Views for the management application.
//!
//! Each view binds a request directly to its template.

use serde::Serialize;

use super::models::{PROJECTS, Project};
use crate::exception::Result;
use crate::http::{Request, Response};
use crate::shortcuts::{render, render_with_context};

#[derive(Serialize)]
struct ProjectsContext {
	projects: &'static [Project],
}

pub async fn login(request: Request) -> Result<Response> {
	render(&request, "management/login.html")
}

pub async fn register(request: Request) -> Result<Response> {
	render(&request, "management/register.html")
}

/// The project list, from the in-memory fixture.
pub async fn projects(request: Request) -> Result<Response> {
	render_with_context(
		&request,
		"management/projects.html",
		&ProjectsContext {
			projects: &PROJECTS,
		},
	)
}
