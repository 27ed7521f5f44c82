//! Canvas project management CLI (the project's `manage.py`).

use clap::{Parser, Subcommand};
use console::style;
use std::process;

use canvas::commands;

#[derive(Parser)]
#[command(name = "canvas-manage")]
#[command(about = "Canvas project management interface", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Verbosity level (can be repeated for more output)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the development server
	Runserver {
		/// Server address, `PORT` or `HOST:PORT` (default: from settings)
		#[arg(value_name = "ADDRESS")]
		address: Option<String>,

		/// Disable auto-reload
		#[arg(long)]
		noreload: bool,

		/// Serve static files even when debug is off
		#[arg(long)]
		insecure: bool,
	},

	/// Check the project for common issues
	Check,

	/// Display all registered URL patterns
	Showurls {
		/// Show only named URLs
		#[arg(long)]
		names: bool,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	let result = match cli.command {
		Commands::Runserver {
			address,
			noreload,
			insecure,
		} => commands::run_runserver(address, noreload, insecure, cli.verbosity).await,
		Commands::Check => commands::run_check(cli.verbosity).await,
		Commands::Showurls { names } => commands::run_showurls(names, cli.verbosity).await,
	};

	if let Err(e) = result {
		eprintln!("{} {}", style("Error:").red().bold(), e);
		process::exit(1);
	}
}
