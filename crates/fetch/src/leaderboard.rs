//! Research leaderboard client.

use std::sync::Arc;

use claimcheck_core::ScraperConfig;
use extract::{LeaderboardEntry, PaperDetails, PaperSearchResult, parse_leaderboard, parse_paper_details, parse_search_results};
use parser::HtmlDocument;
use tracing::info;

use crate::Result;
use crate::client::{PageFetcher, base_url, url_with_params};

#[derive(Clone)]
pub struct LeaderboardClient {
  fetcher: Arc<dyn PageFetcher>,
  base_url: String,
}

impl LeaderboardClient {
  pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ScraperConfig) -> Self {
    Self {
      fetcher,
      base_url: base_url(&config.leaderboard_url),
    }
  }

  pub fn task_url(&self, task: &str) -> String {
    format!("{}/task/{}", self.base_url, task)
  }

  /// Paper page URL for a slug or a path such as `/paper/some-slug`.
  pub fn paper_url(&self, paper: &str) -> String {
    if paper.starts_with("http://") || paper.starts_with("https://") {
      return paper.to_string();
    }
    let slug = paper.trim_start_matches('/').trim_start_matches("paper/");
    format!("{}/paper/{}", self.base_url, slug)
  }

  /// Every row of a task's leaderboard.
  pub async fn task_leaderboard(&self, task: &str) -> Result<Vec<LeaderboardEntry>> {
    let html = self.fetcher.get_text(&self.task_url(task)).await?;
    let doc = HtmlDocument::parse(&html)?;
    let entries = parse_leaderboard(&doc, task, &self.base_url);
    info!(task, count = entries.len(), "Parsed leaderboard");
    Ok(entries)
  }

  pub async fn search_papers(&self, query: &str) -> Result<Vec<PaperSearchResult>> {
    let url = url_with_params(&format!("{}/search", self.base_url), &[("q", query)])?;
    let html = self.fetcher.get_text(&url).await?;
    let doc = HtmlDocument::parse(&html)?;
    let results = parse_search_results(&doc, &self.base_url);
    info!(query, count = results.len(), "Searched papers");
    Ok(results)
  }

  pub async fn paper_details(&self, paper: &str) -> Result<PaperDetails> {
    let url = self.paper_url(paper);
    let html = self.fetcher.get_text(&url).await?;
    let doc = HtmlDocument::parse(&html)?;
    Ok(parse_paper_details(&doc, &url))
  }
}
