//! Research leaderboard pages: task leaderboards, paper search results and paper details.

use claimcheck_core::{BenchmarkRecord, normalize_label};
use parser::{Element, HtmlDocument};
use serde::{Deserialize, Serialize};

use crate::catalog::BenchmarkCatalog;
use crate::numeric::parse_score;
use crate::shots::extract_num_shots;

/// One row of a task leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub task: String,
  pub dataset: String,
  pub metric: String,
  /// Score exactly as displayed
  pub value: String,
  pub model: String,
  pub paper_title: String,
  pub paper_url: String,
  #[serde(default)]
  pub code_url: Option<String>,
  #[serde(default)]
  pub year: Option<u16>,
}

impl LeaderboardEntry {
  /// Convert to a benchmark record, or `None` if the value does not parse.
  ///
  /// The canonical task is resolved from the task label first, then the
  /// metric label; leaderboards outside the catalog keep no canonical task.
  pub fn to_record(&self, catalog: &BenchmarkCatalog) -> Option<BenchmarkRecord> {
    let value = parse_score(&self.value)?;
    let mut record = BenchmarkRecord::new(&self.task, value)
      .with_dataset(normalize_label(&self.dataset))
      .with_shots(extract_num_shots(&self.metric).or_else(|| extract_num_shots(&self.task)))
      .with_raw_text(self.value.clone());

    if let Some(task) = catalog.match_task(&self.task).or_else(|| catalog.match_task(&self.metric)) {
      record = record.with_task(task);
    }
    Some(record)
  }
}

/// Parse the leaderboard table of a task page.
///
/// Only the first table whose class mentions "leaderboard" is read; its first
/// row is the header. Rows need at least four cells: model, metric, value and
/// one more (usually the paper's year).
pub fn parse_leaderboard(doc: &HtmlDocument, task: &str, base_url: &str) -> Vec<LeaderboardEntry> {
  let Some(table) = doc
    .tables()
    .into_iter()
    .find(|t| t.element().has_class_containing("leaderboard"))
  else {
    return Vec::new();
  };

  table
    .rows()
    .into_iter()
    .skip(1)
    .filter(|cells| cells.len() >= 4)
    .map(|cells| {
      let model_cell = cells[0];
      let model = model_cell.text();
      let paper_url = model_cell
        .find_first("a", |a| a.attr("href").is_some_and(|href| href.contains("/paper/")))
        .and_then(|a| a.attr("href"))
        .map(|href| absolute_url(base_url, &href))
        .unwrap_or_default();

      LeaderboardEntry {
        task: task.to_string(),
        dataset: task.to_string(),
        metric: cells[1].text(),
        value: cells[2].text(),
        paper_title: model.clone(),
        model,
        paper_url,
        code_url: cells.iter().find_map(|cell| github_link(*cell)),
        year: cells[3..].iter().find_map(|cell| parse_year(&cell.text())),
      }
    })
    .collect()
}

/// A paper listed on a search results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSearchResult {
  pub title: String,
  pub url: String,
  #[serde(rename = "abstract")]
  pub summary: String,
}

/// Parse paper cards from a search results page. Cards without a title link are skipped.
pub fn parse_search_results(doc: &HtmlDocument, base_url: &str) -> Vec<PaperSearchResult> {
  doc
    .find_all("div")
    .into_iter()
    .filter(|div| div.has_class_containing("paper-card"))
    .filter_map(|card| {
      let title = card.find_first("a", |a| a.has_class_containing("title"))?;
      let summary = card
        .find_first("p", |p| p.has_class_containing("abstract"))
        .map(|p| p.text())
        .unwrap_or_default();

      Some(PaperSearchResult {
        title: title.text(),
        url: absolute_url(base_url, &title.attr("href").unwrap_or_default()),
        summary,
      })
    })
    .collect()
}

/// A `method / metric / value` row from a paper's results tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperBenchmark {
  pub method: String,
  pub metric: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDetails {
  pub title: String,
  #[serde(rename = "abstract")]
  pub summary: String,
  pub benchmarks: Vec<PaperBenchmark>,
  #[serde(default)]
  pub code_url: Option<String>,
  pub url: String,
}

/// Parse a paper page: title, abstract, code link and every results table.
pub fn parse_paper_details(doc: &HtmlDocument, url: &str) -> PaperDetails {
  let title = doc.find_first("h1", |_| true).map(|h| h.text()).unwrap_or_default();
  let summary = doc
    .find_first("div", |d| d.has_class_containing("abstract"))
    .map(|d| d.text())
    .unwrap_or_default();
  let code_url = doc.find_first("a", is_github_link).and_then(|a| a.attr("href"));

  let benchmarks = doc
    .tables()
    .into_iter()
    .flat_map(|table| table.rows().into_iter().skip(1))
    .filter_map(|cells| {
      let data: Vec<Element<'_>> = cells.into_iter().filter(|c| c.is("td")).collect();
      let [method, metric, value, ..] = data.as_slice() else {
        return None;
      };
      Some(PaperBenchmark {
        method: method.text(),
        metric: metric.text(),
        value: value.text(),
      })
    })
    .collect();

  PaperDetails {
    title,
    summary,
    benchmarks,
    code_url,
    url: url.to_string(),
  }
}

fn is_github_link(a: &Element<'_>) -> bool {
  a.attr("href").is_some_and(|href| href.contains("github.com"))
}

/// First GitHub link inside an element.
fn github_link(element: Element<'_>) -> Option<String> {
  element.find_first("a", is_github_link).and_then(|a| a.attr("href"))
}

fn absolute_url(base_url: &str, href: &str) -> String {
  if href.starts_with("http://") || href.starts_with("https://") {
    href.to_string()
  } else {
    format!("{}{}", base_url.trim_end_matches('/'), href)
  }
}

fn parse_year(text: &str) -> Option<u16> {
  let year: u16 = text.trim().parse().ok()?;
  (1900..=2100).contains(&year).then_some(year)
}
