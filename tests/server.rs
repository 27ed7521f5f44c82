mod common;

use canvas::conf::Settings;
use canvas::server::{HttpServer, ShutdownCoordinator};
use rstest::rstest;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

async fn start() -> (SocketAddr, ShutdownCoordinator, JoinHandle<canvas::Result<()>>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
	let app = Arc::new(common::app(Settings::default()));
	let server = tokio::spawn(HttpServer::new(app).serve_with_shutdown(listener, coordinator.clone()));
	(addr, coordinator, server)
}

fn client() -> reqwest::Client {
	reqwest::Client::builder()
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_pages_over_http() {
	let (addr, coordinator, server) = start().await;
	let client = client();

	for (path, status) in [
		("/", 200),
		("/login/", 200),
		("/register/", 200),
		("/projects/", 200),
		("/admin/", 200),
		("/nowhere/", 404),
		("/projects", 301),
	] {
		let response = client
			.get(format!("http://{}{}", addr, path))
			.send()
			.await
			.unwrap();
		assert_eq!(response.status().as_u16(), status, "{path}");
	}

	let projects = client
		.get(format!("http://{}/projects/", addr))
		.send()
		.await
		.unwrap();
	assert_eq!(
		projects.headers()["content-type"],
		"text/html; charset=utf-8"
	);
	assert!(projects.text().await.unwrap().contains("Project E"));

	coordinator.shutdown();
	tokio::time::timeout(Duration::from_secs(5), server)
		.await
		.unwrap()
		.unwrap()
		.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_stops_accepting_after_shutdown() {
	let (addr, coordinator, server) = start().await;

	coordinator.shutdown();
	tokio::time::timeout(Duration::from_secs(5), server)
		.await
		.unwrap()
		.unwrap()
		.unwrap();

	assert!(client().get(format!("http://{}/", addr)).send().await.is_err());
}
