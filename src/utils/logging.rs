//! Logging utilities for the application
//!
//! This module provides utilities for setting up and configuring logging for the application.
//! It uses the `tracing_subscriber` crate to configure the logging.
//!
//! The `setup_logging` function reads the logging mode from the environment:
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_LEVEL`: default level when `RUST_LOG` is not set (default: `info`)
//! - `LOG_DATA_DIR`: directory of the daily rolling log files (default: `logs/`)
//!
//! The `setup_logging_with_writer` function sets up the logging for the application with a custom
//! writer.
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// File name prefix of the rolling log files
const LOG_FILE_PREFIX: &str = "token-list-sync.log";

/// Setup logging for the application
///
/// Logs to stdout unless `LOG_MODE=file`, in which case a daily rolling file under
/// `LOG_DATA_DIR` is used.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
	let log_mode = std::env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());

	if log_mode.eq_ignore_ascii_case("file") {
		let log_dir = std::env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
		std::fs::create_dir_all(&log_dir)?;
		let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
		setup_logging_with_writer(appender, &level, false)
	} else {
		setup_logging_with_writer(std::io::stdout, &level, true)
	}
}

/// Setup logging for the application with a custom writer
///
/// `RUST_LOG` takes precedence over `default_level` when it is set.
pub fn setup_logging_with_writer<W>(
	writer: W,
	default_level: &str,
	ansi: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	// Create a filter based on environment variable or default to the given level
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
