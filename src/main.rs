//! Token list synchronizer entry point.
//!
//! Loads the configuration, connects to the network and runs the
//! synchronization loop until it completes, fails or Ctrl+C is received.
//!
//! # Flow
//! 1. Loads `.env` and applies the logging flags
//! 2. Loads and validates the configuration file
//! 3. Resolves the factories and wires the services
//! 4. Runs one iteration, or loops when an interval is configured
//!
//! Exits with a non-zero status when an iteration fails.

use std::{
	env::{set_var, var},
	path::PathBuf,
};

use clap::{Arg, Command};
use dotenvy::dotenv;
use tracing::{error, info};

use token_list_sync::{
	bootstrap::{initialize_services, load_config, Result},
	utils::{constants::DEFAULT_CONFIG_PATH, logging::setup_logging},
};

#[tokio::main]
async fn main() -> Result<()> {
	let matches = Command::new("token-list-sync")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Builds a versioned token list from the collections created by on-chain factories \
			 and republishes it whenever the listed tokens change.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.short('c')
				.help("Path to the configuration file (default: config/token_list.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("once")
				.long("once")
				.help("Run a single iteration even if a loop interval is configured")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config_path = matches
		.get_one::<String>("config")
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

	let mut config = load_config(&config_path).map_err(|e| {
		error!(path = %config_path.display(), "Failed to load configuration: {}", e);
		e
	})?;

	if matches.get_flag("once") {
		config.loop_interval_ms = None;
	}

	info!(
		list = %config.list_name,
		network = %config.network.slug,
		loop_interval_ms = ?config.loop_interval_ms,
		"Starting token list synchronizer"
	);

	let synchronizer = initialize_services(config).await.map_err(|e| {
		error!("Failed to initialize services: {}", e);
		e
	})?;

	tokio::select! {
		result = synchronizer.run() => {
			if let Err(e) = result {
				error!("Synchronization failed: {}", e);
				return Err(e.into());
			}
			info!("Synchronization completed");
		}
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping synchronizer");
		}
	}

	Ok(())
}
