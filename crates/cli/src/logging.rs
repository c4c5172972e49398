//! Logging setup for the CLI

use claimcheck_core::{Config, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "claimcheck.log";

/// Parse log level from config string
fn parse_log_level(level: &str) -> tracing::Level {
  match level.to_lowercase().as_str() {
    "off" | "error" => tracing::Level::ERROR,
    "warn" => tracing::Level::WARN,
    "info" => tracing::Level::INFO,
    "debug" => tracing::Level::DEBUG,
    "trace" => tracing::Level::TRACE,
    _ => tracing::Level::INFO,
  }
}

/// Level after applying `-v` flags on top of the configured level.
fn effective_level(config: &LoggingConfig, verbose: u8) -> tracing::Level {
  match verbose {
    0 => parse_log_level(&config.level),
    1 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  }
}

/// Initialize logging: stderr always, plus a rolling file when enabled in config.
///
/// RUST_LOG overrides the configured level. Returns the guard that must be
/// kept alive for file logs to be flushed.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Option<WorkerGuard> {
  let level = effective_level(config, verbose);
  let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

  let console = tracing_subscriber::fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(verbose > 0);

  let log_dir = Config::log_dir();
  let (file_layer, guard) = if config.file && std::fs::create_dir_all(&log_dir).is_ok() {
    let file_appender = match config.rotation.as_str() {
      "hourly" => tracing_appender::rolling::hourly(&log_dir, LOG_FILE),
      "never" => tracing_appender::rolling::never(&log_dir, LOG_FILE),
      _ => tracing_appender::rolling::daily(&log_dir, LOG_FILE),
    };
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let layer = tracing_subscriber::fmt::layer()
      .with_target(true)
      .with_ansi(false)
      .with_writer(file_writer);
    (Some(layer), Some(guard))
  } else {
    (None, None)
  };

  tracing_subscriber::registry()
    .with(env_filter)
    .with(console)
    .with(file_layer)
    .init();

  guard
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_log_level() {
    assert_eq!(parse_log_level("DEBUG"), tracing::Level::DEBUG);
    assert_eq!(parse_log_level("off"), tracing::Level::ERROR);
    assert_eq!(parse_log_level("bogus"), tracing::Level::INFO);
  }

  #[test]
  fn test_verbose_overrides_config() {
    let config = LoggingConfig {
      level: "warn".to_string(),
      ..LoggingConfig::default()
    };
    assert_eq!(effective_level(&config, 0), tracing::Level::WARN);
    assert_eq!(effective_level(&config, 1), tracing::Level::DEBUG);
    assert_eq!(effective_level(&config, 3), tracing::Level::TRACE);
  }
}
