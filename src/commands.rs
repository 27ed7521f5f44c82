//! Management commands behind `canvas-manage`, like Django's `manage.py`.

use console::style;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::conf::{Settings, SettingsError};
use crate::config::settings::get_settings;
use crate::exception::Error;
use crate::handler::{AppState, Application};
use crate::logging;
use crate::server::{HttpServer, ShutdownCoordinator, shutdown_signal};
use crate::urls::UrlEntry;

/// Templates the project's views render.
pub const VIEW_TEMPLATES: &[&str] = &[
	"management/login.html",
	"management/register.html",
	"management/projects.html",
	"editor/index.html",
	"admin/index.html",
	"errors/404.html",
	"errors/500.html",
];

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error(transparent)]
	Project(#[from] Error),

	#[error("cannot bind {address}: {source}")]
	Bind {
		address: SocketAddr,
		#[source]
		source: std::io::Error,
	},

	#[error("system check found {0} issue(s)")]
	CheckFailed(usize),
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Accept `PORT` or `HOST:PORT`, as `runserver` does.
///
/// # Examples
///
/// ```
/// use canvas::commands::normalize_address;
///
/// assert_eq!(normalize_address("8080"), "127.0.0.1:8080");
/// assert_eq!(normalize_address("0.0.0.0:8000"), "0.0.0.0:8000");
/// ```
pub fn normalize_address(address: &str) -> String {
	let address = address.trim();
	if !address.is_empty() && address.chars().all(|c| c.is_ascii_digit()) {
		format!("127.0.0.1:{}", address)
	} else {
		address.to_string()
	}
}

/// Settings for `runserver` after command-line overrides.
pub fn runserver_settings(
	mut settings: Settings,
	address: Option<&str>,
	insecure: bool,
) -> CommandResult<Settings> {
	if let Some(address) = address {
		settings.bind_address = normalize_address(address);
	}
	if insecure {
		settings.serve_static = Some(true);
	}
	settings.validate()?;
	Ok(settings)
}

/// Start the development server and run until Ctrl-C or SIGTERM.
pub async fn run_runserver(
	address: Option<String>,
	noreload: bool,
	insecure: bool,
	verbosity: u8,
) -> CommandResult<()> {
	let settings = runserver_settings(get_settings()?, address.as_deref(), insecure)?;
	logging::init(&settings.log_level, verbosity);

	if !noreload {
		tracing::debug!("auto-reload is not available; restart the server after changes");
	}

	let addr = settings.socket_addr()?;
	let timeout = Duration::from_secs(settings.shutdown_timeout_secs);
	let serves_static = settings.serves_static();
	let application = Arc::new(Application::new(settings)?);

	let listener = TcpListener::bind(addr)
		.await
		.map_err(|source| CommandError::Bind { address: addr, source })?;

	println!(
		"Starting development server at {}",
		style(format!("http://{}/", addr)).cyan().bold()
	);
	if serves_static {
		println!("Serving static files from this process.");
	}
	println!("Quit the server with CONTROL-C.");

	let coordinator = ShutdownCoordinator::new(timeout);
	let trigger = coordinator.clone();
	tokio::spawn(async move {
		shutdown_signal().await;
		trigger.shutdown();
	});

	HttpServer::new(application)
		.serve_with_shutdown(listener, coordinator)
		.await?;
	Ok(())
}

/// Rows for `showurls`, as `(pattern, name)`.
pub fn url_rows(entries: &[UrlEntry], names_only: bool) -> Vec<(String, String)> {
	entries
		.iter()
		.filter(|entry| !names_only || entry.name.is_some())
		.map(|entry| {
			(
				entry.pattern.clone(),
				entry.name.clone().unwrap_or_else(|| "-".to_string()),
			)
		})
		.collect()
}

/// Print the resolved URL table.
pub async fn run_showurls(names: bool, verbosity: u8) -> CommandResult<()> {
	let settings = get_settings()?;
	logging::init(&settings.log_level, verbosity);
	let state = AppState::new(settings)?;

	let rows = url_rows(&state.router.entries(), names);
	if rows.is_empty() {
		println!("No URL patterns registered.");
		return Ok(());
	}

	println!("{}", style(format!("{:<40} {}", "URL Pattern", "Name")).bold());
	println!("{}", "=".repeat(60));
	for (pattern, name) in rows {
		println!("{:<40} {}", pattern, name);
	}
	Ok(())
}

/// Outcome of one system check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckMessage {
	Passed(String),
	Warning(String),
	Failed(String),
}

/// Run the system checks for `settings`.
///
/// Returns every message; settings that fail validation or an app registry
/// that cannot be populated are reported as failures rather than errors.
pub fn system_checks(settings: Settings) -> Vec<CheckMessage> {
	let mut messages = Vec::new();

	match settings.validate() {
		Ok(()) => messages.push(CheckMessage::Passed("settings are valid".to_string())),
		Err(error) => {
			messages.push(CheckMessage::Failed(error.to_string()));
			return messages;
		}
	}

	let serves_static = settings.serves_static();
	let static_dir = settings.static_dir.clone();
	let debug = settings.debug;

	let state = match AppState::new(settings) {
		Ok(state) => state,
		Err(error) => {
			messages.push(CheckMessage::Failed(error.to_string()));
			return messages;
		}
	};
	messages.push(CheckMessage::Passed(format!(
		"{} application(s) installed, {} URL pattern(s)",
		state.apps.get_app_configs().len(),
		state.router.routes().len()
	)));

	let templates = state.templates.template_names();
	messages.push(CheckMessage::Passed(format!("{} template(s) loaded", templates.len())));
	for name in VIEW_TEMPLATES {
		if !templates.iter().any(|t| t == name) {
			messages.push(CheckMessage::Failed(format!("template '{}' does not exist", name)));
		}
	}

	if serves_static && !static_dir.is_dir() {
		messages.push(CheckMessage::Warning(format!(
			"static directory '{}' does not exist; only built-in assets will be served",
			static_dir.display()
		)));
	}
	if debug {
		messages.push(CheckMessage::Warning(
			"debug is on; do not use these settings in production".to_string(),
		));
	}

	messages
}

/// Check the project for common problems.
pub async fn run_check(verbosity: u8) -> CommandResult<()> {
	let settings = get_settings()?;
	logging::init(&settings.log_level, verbosity);

	println!("System check:");
	let messages = system_checks(settings);
	let mut failed = 0;
	for message in &messages {
		match message {
			CheckMessage::Passed(text) => println!("  {} {}", style("✓").green(), text),
			CheckMessage::Warning(text) => println!("  {} {}", style("⚠").yellow(), text),
			CheckMessage::Failed(text) => {
				failed += 1;
				println!("  {} {}", style("✗").red(), text);
			}
		}
	}

	if failed > 0 {
		return Err(CommandError::CheckFailed(failed));
	}
	println!("System check identified no issues.");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, false, "127.0.0.1:8000", false)]
	#[case(Some("9000"), false, "127.0.0.1:9000", false)]
	#[case(Some("0.0.0.0:8080"), true, "0.0.0.0:8080", true)]
	fn test_runserver_settings(
		#[case] address: Option<&str>,
		#[case] insecure: bool,
		#[case] bind_address: &str,
		#[case] serves_static_with_debug_off: bool,
	) {
		let settings = Settings {
			debug: false,
			..Settings::default()
		};

		let settings = runserver_settings(settings, address, insecure).unwrap();

		assert_eq!(settings.bind_address, bind_address);
		assert_eq!(settings.serves_static(), serves_static_with_debug_off);
	}

	#[rstest]
	fn test_runserver_rejects_bad_address() {
		let result = runserver_settings(Settings::default(), Some("localhost"), false);

		assert!(matches!(
			result,
			Err(CommandError::Settings(SettingsError::Invalid {
				key: "bind_address",
				..
			}))
		));
	}

	#[rstest]
	fn test_url_rows_names_only() {
		let entries = vec![
			UrlEntry {
				pattern: "/".to_string(),
				name: Some("editor".to_string()),
			},
			UrlEntry {
				pattern: "/raw".to_string(),
				name: None,
			},
		];

		assert_eq!(url_rows(&entries, false).len(), 2);
		assert_eq!(
			url_rows(&entries, true),
			vec![("/".to_string(), "editor".to_string())]
		);
	}

	#[rstest]
	fn test_system_checks_pass_for_defaults() {
		let messages = system_checks(Settings {
			static_dir: "/nonexistent/canvas-static".into(),
			..Settings::default()
		});

		assert!(!messages.iter().any(|m| matches!(m, CheckMessage::Failed(_))));
		assert!(messages.iter().any(|m| matches!(m, CheckMessage::Warning(text) if text.contains("static directory"))));
		assert!(messages.iter().any(|m| matches!(m, CheckMessage::Passed(text) if text.ends_with("template(s) loaded"))));
	}

	#[rstest]
	fn test_system_checks_report_unknown_app() {
		let messages = system_checks(Settings {
			installed_apps: vec!["billing".to_string()],
			..Settings::default()
		});

		assert!(matches!(messages.last(), Some(CheckMessage::Failed(text)) if text.contains("billing")));
	}
}
