//! Configuration system for claimcheck.
//!
//! Config priority: working directory (./claimcheck.toml) > user (~/.config/claimcheck/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "claimcheck.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

// ============================================================================
// Scraper Configuration
// ============================================================================

/// Endpoints and transport settings for the hub and leaderboard sites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
  /// Model hub base URL (model pages, README files)
  pub hub_url: String,

  /// Model hub JSON API base URL
  pub api_url: String,

  /// Research leaderboard base URL
  pub leaderboard_url: String,

  /// User-Agent header sent with every request
  pub user_agent: String,

  /// Per-request timeout in seconds (default: 30)
  pub timeout_secs: u64,

  /// Maximum models fetched at once during batch scraping (default: 4)
  pub max_concurrent: usize,
}

impl Default for ScraperConfig {
  fn default() -> Self {
    Self {
      hub_url: "https://huggingface.co".to_string(),
      api_url: "https://huggingface.co/api".to_string(),
      leaderboard_url: "https://paperswithcode.com".to_string(),
      user_agent: concat!("claimcheck/", env!("CARGO_PKG_VERSION")).to_string(),
      timeout_secs: 30,
      max_concurrent: 4,
    }
  }
}

// ============================================================================
// Retry Configuration
// ============================================================================

/// Backoff settings for transient HTTP failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
  /// Maximum number of retry attempts (default: 3)
  pub max_retries: u32,

  /// Backoff before the first retry in milliseconds (default: 1000)
  pub initial_backoff_ms: u64,

  /// Upper bound for any single backoff in milliseconds (default: 30000)
  pub max_backoff_ms: u64,

  /// Exponential factor applied per attempt (default: 2.0)
  pub backoff_multiplier: f64,

  /// Add up to 25% random jitter to each backoff (default: true)
  pub jitter: bool,
}

impl Default for RetrySettings {
  fn default() -> Self {
    Self {
      max_retries: 3,
      initial_backoff_ms: 1000,
      max_backoff_ms: 30_000,
      backoff_multiplier: 2.0,
      jitter: true,
    }
  }
}

// ============================================================================
// Comparison Configuration
// ============================================================================

/// Overclaim detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
  /// A task is overclaimed when actual trails reported by more than this percentage (default: 5.0)
  pub overclaim_threshold_pct: f64,

  /// Tasks compared when none are given on the command line
  pub default_tasks: Vec<String>,
}

impl Default for ComparisonConfig {
  fn default() -> Self {
    Self {
      overclaim_threshold_pct: 5.0,
      default_tasks: vec!["mmlu".to_string(), "humaneval".to_string(), "mbpp".to_string()],
    }
  }
}

// ============================================================================
// Storage Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Directory holding one JSON file per scraped model (default: "data")
  pub data_dir: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("data"),
    }
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: "off", "error", "warn", "info", "debug", "trace"
  /// Default: "info"
  pub level: String,

  /// Also write logs to a rolling file in the data directory (default: false)
  pub file: bool,

  /// Log file rotation: "daily", "hourly", "never"
  /// Default: "daily"
  pub rotation: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      file: false,
      rotation: "daily".to_string(),
    }
  }
}

// ============================================================================
// Catalog Configuration
// ============================================================================

/// A user-supplied benchmark identifier, checked before the built-in catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntryConfig {
  /// Canonical task key (e.g., "musr")
  pub key: String,

  /// Lowercase substrings that identify the benchmark in a label
  #[serde(default)]
  pub aliases: Vec<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,

  /// Metric the benchmark is reported in (default: "accuracy")
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metric: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  pub extra: Vec<CatalogEntryConfig>,
}

// ============================================================================
// Main Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub scraper: ScraperConfig,

  #[serde(default)]
  pub retry: RetrySettings,

  #[serde(default)]
  pub comparison: ComparisonConfig,

  #[serde(default)]
  pub storage: StorageConfig,

  #[serde(default)]
  pub logging: LoggingConfig,

  #[serde(default)]
  pub catalog: CatalogConfig,
}

impl Config {
  /// Load config for a working directory, with fallback to user config.
  ///
  /// Unreadable or invalid files are skipped; use [`Config::load_from`] to
  /// surface the error instead.
  pub fn load_for_project(project_path: &Path) -> Self {
    let project_config = Self::project_config_path(project_path);
    if project_config.exists()
      && let Ok(config) = Self::load_from(&project_config)
    {
      return config;
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(config) = Self::load_from(&user_config_path)
    {
      return config;
    }

    Self::default()
  }

  /// Load a config file, reporting IO and parse failures.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLAIMCHECK_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("claimcheck").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("claimcheck").join("config.toml"))
  }

  /// Get the working-directory config path
  pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(PROJECT_CONFIG_FILE)
  }

  /// Directory for rolling log files
  pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
      .unwrap_or_else(|| PathBuf::from(".cache"))
      .join("claimcheck")
      .join("logs")
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Config::default();
    let tasks = defaults
      .comparison
      .default_tasks
      .iter()
      .map(|t| format!("\"{}\"", t))
      .collect::<Vec<_>>()
      .join(", ");

    format!(
      r#"# claimcheck configuration
# Place in ./claimcheck.toml (per directory) or ~/.config/claimcheck/config.toml (user)

# ============================================================================
# Sources
# ============================================================================

[scraper]
hub_url = "{hub_url}"
api_url = "{api_url}"
leaderboard_url = "{leaderboard_url}"

# Per-request timeout (seconds)
timeout_secs = {timeout_secs}

# Models fetched concurrently by `claimcheck batch`
max_concurrent = {max_concurrent}

# ============================================================================
# Retries (429, 502, 503, 504, timeouts, connection errors)
# ============================================================================

[retry]
max_retries = {max_retries}
initial_backoff_ms = {initial_backoff_ms}
max_backoff_ms = {max_backoff_ms}
backoff_multiplier = {backoff_multiplier:.1}
jitter = {jitter}

# ============================================================================
# Comparison
# ============================================================================

[comparison]
# Flag a task when actual trails reported by more than this percentage
overclaim_threshold_pct = {threshold:.1}

# Tasks compared when --tasks is not given
default_tasks = [{tasks}]

# ============================================================================
# Storage
# ============================================================================

[storage]
data_dir = "{data_dir}"

# ============================================================================
# Logging
# ============================================================================

[logging]
# off, error, warn, info, debug, trace (RUST_LOG overrides)
level = "{level}"

# Write a rolling log file as well as printing to the console
file = {file}

# daily, hourly, never
rotation = "{rotation}"

# ============================================================================
# Extra benchmark identifiers (checked before the built-in catalog)
# ============================================================================

# [[catalog.extra]]
# key = "musr"
# aliases = ["musr"]
# display_name = "MuSR"
# metric = "accuracy"
"#,
      hub_url = defaults.scraper.hub_url,
      api_url = defaults.scraper.api_url,
      leaderboard_url = defaults.scraper.leaderboard_url,
      timeout_secs = defaults.scraper.timeout_secs,
      max_concurrent = defaults.scraper.max_concurrent,
      max_retries = defaults.retry.max_retries,
      initial_backoff_ms = defaults.retry.initial_backoff_ms,
      max_backoff_ms = defaults.retry.max_backoff_ms,
      backoff_multiplier = defaults.retry.backoff_multiplier,
      jitter = defaults.retry.jitter,
      threshold = defaults.comparison.overclaim_threshold_pct,
      data_dir = defaults.storage.data_dir.display(),
      level = defaults.logging.level,
      file = defaults.logging.file,
      rotation = defaults.logging.rotation,
    )
  }
}
