#![allow(dead_code)]

use canvas::conf::Settings;
use canvas::handler::Application;
use canvas::http::{Handler, Request, Response};
use hyper::Method;

pub fn app(settings: Settings) -> Application {
	Application::new(settings).unwrap()
}

pub async fn get(app: &Application, uri: &str) -> Response {
	request(app, Method::GET, uri).await
}

pub async fn request(app: &Application, method: Method, uri: &str) -> Response {
	app.handle(Request::builder().method(method).uri(uri).build())
		.await
		.unwrap()
}
