//! CLI command implementations

mod compare;
mod config;
mod papers;
mod scrape;

pub use compare::{CompareArgs, cmd_compare};
pub use config::{cmd_config_init, cmd_config_show};
pub use papers::{cmd_leaderboard, cmd_paper, cmd_search_papers};
pub use scrape::{cmd_batch, cmd_info, cmd_popular, cmd_scrape};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use benchmark::ScoreStore;
use claimcheck_core::Config;
use extract::BenchmarkCatalog;
use fetch::{HttpClient, HubClient, LeaderboardClient, PageFetcher};

/// Configuration and the clients built from it.
pub struct Context {
  pub cwd: PathBuf,
  pub config: Config,
  pub catalog: BenchmarkCatalog,
}

impl Context {
  pub fn load() -> Self {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_for_project(&cwd);
    let catalog = BenchmarkCatalog::from_config(&config.catalog);
    Self { cwd, config, catalog }
  }

  fn fetcher(&self) -> Result<Arc<dyn PageFetcher>> {
    let client = HttpClient::new(&self.config.scraper, &self.config.retry).context("Failed to build HTTP client")?;
    Ok(Arc::new(client))
  }

  pub fn hub(&self) -> Result<HubClient> {
    Ok(HubClient::new(self.fetcher()?, &self.config.scraper, self.catalog.clone()))
  }

  pub fn leaderboard(&self) -> Result<LeaderboardClient> {
    Ok(LeaderboardClient::new(self.fetcher()?, &self.config.scraper))
  }

  pub fn store(&self) -> ScoreStore {
    ScoreStore::new(&self.config.storage.data_dir)
  }
}

/// `1234567` → `1,234,567`
pub fn format_count(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// Shorten to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let kept: String = text.chars().take(max.saturating_sub(3)).collect();
  format!("{kept}...")
}
