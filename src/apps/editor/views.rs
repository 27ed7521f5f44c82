use crate::exception::Result;
use crate::http::{Request, Response};
use crate::shortcuts::render;

/// The editor page: a canvas for the 3D scene and a fullscreen toggle.
pub async fn index(request: Request) -> Result<Response> {
	render(&request, "editor/index.html")
}
