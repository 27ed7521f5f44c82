//! Development static file serving, like `django.contrib.staticfiles`.
//!
//! Mounted at `{static_url}{path:path}` when static serving is enabled.
//! Files come from the static directory; assets bundled into the binary
//! fill in for files the directory lacks.

use async_trait::async_trait;
use hyper::Method;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

use crate::exception::{Error, Result};
use crate::http::{Handler, Request, Response};

/// Assets compiled into the binary, keyed by path relative to the static root.
const BUILTIN_ASSETS: &[(&str, &str)] = &[
	("css/canvas.css", include_str!("../static/css/canvas.css")),
	("js/darkmode.js", include_str!("../static/js/darkmode.js")),
	("js/editor.mjs", include_str!("../static/js/editor.mjs")),
	("js/menu.mjs", include_str!("../static/js/menu.mjs")),
	("js/objects.mjs", include_str!("../static/js/objects.mjs")),
	("js/picker.mjs", include_str!("../static/js/picker.mjs")),
	("js/inspector.mjs", include_str!("../static/js/inspector.mjs")),
	("js/compass.mjs", include_str!("../static/js/compass.mjs")),
	("js/login.mjs", include_str!("../static/js/login.mjs")),
];

pub struct StaticFilesHandler {
	root: PathBuf,
}

impl StaticFilesHandler {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Decode and validate a requested path, relative to the static root.
	///
	/// # Examples
	///
	/// ```
	/// use canvas::staticfiles::StaticFilesHandler;
	///
	/// assert_eq!(
	///     StaticFilesHandler::safe_relative_path("img/skybox/px.png").unwrap(),
	///     std::path::PathBuf::from("img/skybox/px.png"),
	/// );
	/// assert!(StaticFilesHandler::safe_relative_path("img/%2e%2e/secret").is_none());
	/// ```
	pub fn safe_relative_path(raw: &str) -> Option<PathBuf> {
		let decoded = percent_decode_str(raw).decode_utf8().ok()?;
		if decoded.is_empty() || decoded.contains('\0') || decoded.contains('\\') {
			return None;
		}

		let mut relative = PathBuf::new();
		for segment in decoded.split('/') {
			// Empty segments mean a leading or doubled slash
			if segment.is_empty() {
				return None;
			}
			let mut components = Path::new(segment).components();
			match (components.next(), components.next()) {
				(Some(Component::Normal(part)), None) => relative.push(part),
				_ => return None,
			}
		}
		Some(relative)
	}

	fn builtin(relative: &Path) -> Option<&'static str> {
		BUILTIN_ASSETS
			.iter()
			.find(|(name, _)| Path::new(name) == relative)
			.map(|(_, content)| *content)
	}

	fn content_type(relative: &Path) -> String {
		match relative.extension().and_then(|e| e.to_str()) {
			// Browsers refuse module scripts served as anything else
			Some("mjs" | "js") => "text/javascript".to_string(),
			_ => mime_guess::from_path(relative)
				.first_or_octet_stream()
				.to_string(),
		}
	}

	async fn read(&self, relative: &Path) -> Option<Vec<u8>> {
		let full_path = self.root.join(relative);
		match tokio::fs::metadata(&full_path).await {
			Ok(metadata) if metadata.is_file() => match tokio::fs::read(&full_path).await {
				Ok(content) => return Some(content),
				Err(error) => {
					tracing::warn!(path = %full_path.display(), %error, "cannot read static file");
				}
			},
			Ok(_) => return None,
			Err(_) => {}
		}
		Self::builtin(relative).map(|content| content.as_bytes().to_vec())
	}
}

#[async_trait]
impl Handler for StaticFilesHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::GET && request.method != Method::HEAD {
			return Err(Error::MethodNotAllowed {
				method: request.method.to_string(),
				allowed: vec!["GET".to_string(), "HEAD".to_string()],
			});
		}

		let not_found = || Error::NotFound {
			path: request.path().to_string(),
			tried: Vec::new(),
		};

		let raw = request.path_param("path").ok_or_else(not_found)?;
		let relative = Self::safe_relative_path(raw).ok_or_else(not_found)?;
		let content = self.read(&relative).await.ok_or_else(not_found)?;

		let response = Response::ok()
			.with_content_type(&Self::content_type(&relative))
			.with_header("Content-Length", &content.len().to_string());

		if request.method == Method::HEAD {
			Ok(response)
		} else {
			Ok(response.with_body(content))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::StatusCode;
	use rstest::{fixture, rstest};
	use std::collections::HashMap;
	use tempfile::TempDir;

	#[fixture]
	fn static_root() -> TempDir {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir_all(dir.path().join("js")).unwrap();
		std::fs::create_dir_all(dir.path().join("models")).unwrap();
		std::fs::write(dir.path().join("js/editor.mjs"), "export {};").unwrap();
		std::fs::write(dir.path().join("models/heliostat.glb"), [0u8, 1, 2]).unwrap();
		dir
	}

	fn request(method: Method, path: &str) -> Request {
		let mut request = Request::builder()
			.method(method)
			.uri(format!("/static/{}", path))
			.build();
		request.path_params = HashMap::from([("path".to_string(), path.to_string())]);
		request
	}

	#[rstest]
	#[case("img/skybox/px.png", Some("img/skybox/px.png"))]
	#[case("models%2Fheliostat.glb", Some("models/heliostat.glb"))]
	#[case("../Cargo.toml", None)]
	#[case("js/%2E%2E/%2E%2E/etc/passwd", None)]
	#[case("js/./editor.mjs", None)]
	#[case("%2Fetc/passwd", None)]
	#[case("js//editor.mjs", None)]
	#[case("js/%00.mjs", None)]
	#[case("", None)]
	fn test_safe_relative_path(#[case] raw: &str, #[case] expected: Option<&str>) {
		assert_eq!(
			StaticFilesHandler::safe_relative_path(raw),
			expected.map(PathBuf::from)
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_serves_module_script(static_root: TempDir) {
		let handler = StaticFilesHandler::new(static_root.path());

		let response = handler.handle(request(Method::GET, "js/editor.mjs")).await.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.content_type(), Some("text/javascript"));
		assert_eq!(response.text(), "export {};");
	}

	#[rstest]
	#[tokio::test]
	async fn test_head_has_no_body(static_root: TempDir) {
		let handler = StaticFilesHandler::new(static_root.path());

		let response = handler
			.handle(request(Method::HEAD, "models/heliostat.glb"))
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.headers.get("content-length").unwrap(), "3");
		assert!(response.body.is_empty());
	}

	#[rstest]
	#[case("js")]
	#[case("missing.css")]
	#[case("..%2FCargo.toml")]
	#[tokio::test]
	async fn test_not_found(static_root: TempDir, #[case] path: &str) {
		let handler = StaticFilesHandler::new(static_root.path());

		let result = handler.handle(request(Method::GET, path)).await;

		assert!(matches!(result, Err(Error::NotFound { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_builtin_stylesheet_fills_in(static_root: TempDir) {
		let handler = StaticFilesHandler::new(static_root.path());

		let response = handler.handle(request(Method::GET, "css/canvas.css")).await.unwrap();

		assert_eq!(response.content_type(), Some("text/css"));
		assert!(!response.body.is_empty());
	}

	#[rstest]
	#[case("js/darkmode.js")]
	#[case("js/login.mjs")]
	#[case("js/compass.mjs")]
	#[tokio::test]
	async fn test_builtin_scripts_fill_in(#[case] path: &str) {
		let empty = TempDir::new().unwrap();
		let handler = StaticFilesHandler::new(empty.path());

		let response = handler.handle(request(Method::GET, path)).await.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.content_type(), Some("text/javascript"));
		assert!(!response.body.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_post_not_allowed(static_root: TempDir) {
		let handler = StaticFilesHandler::new(static_root.path());

		let result = handler.handle(request(Method::POST, "js/editor.mjs")).await;

		assert!(matches!(result, Err(Error::MethodNotAllowed { .. })));
	}
}
