//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter directive for a base level raised by `-v` flags.
///
/// # Examples
///
/// ```
/// use canvas::logging::filter_directive;
///
/// assert_eq!(filter_directive("info", 0), "info");
/// assert_eq!(filter_directive("info", 1), "debug");
/// assert_eq!(filter_directive("warn", 2), "trace");
/// ```
pub fn filter_directive(base: &str, verbosity: u8) -> String {
	const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

	let base = base.trim().to_lowercase();
	match LEVELS.iter().position(|l| *l == base) {
		Some(index) => {
			let raised = (index + verbosity as usize).min(LEVELS.len() - 1);
			LEVELS[raised].to_string()
		}
		// A full directive like "canvas=debug,hyper=warn" is used verbatim
		None => base,
	}
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(base: &str, verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(filter_directive(base, verbosity)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init();
}
