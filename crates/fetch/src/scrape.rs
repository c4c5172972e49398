//! Scrape orchestration: one model, or many with bounded concurrency.

use std::sync::Arc;

use claimcheck_core::ModelData;
use extract::{ModelCard, PageBenchmarkExtractor, extract_metadata, extract_pipeline_tag};
use futures::future::join_all;
use parser::HtmlDocument;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::hub::HubClient;
use crate::{FetchError, Result};

/// Build model data from a model page's HTML.
pub fn model_data_from_html(extractor: &PageBenchmarkExtractor, model_id: &str, html: &str) -> Result<ModelData> {
  let doc = HtmlDocument::parse(html)?;
  if doc.has_errors() {
    debug!(model = model_id, "Model page has syntax errors, extracting what parsed");
  }

  let metadata = extract_metadata(&doc, model_id);
  let benchmarks = extractor.extract(&doc).into_vec();
  let pipeline_tag = extract_pipeline_tag(&doc);
  Ok(ModelData::new(metadata, benchmarks, pipeline_tag))
}

/// Fill gaps in scraped data from the model card.
fn apply_card(data: &mut ModelData, card: ModelCard) {
  let metadata = &mut data.metadata;
  if metadata.language.is_none() {
    metadata.language = card.language;
  }
  if metadata.license.is_none() {
    metadata.license = card.license;
  }
  for tag in card.tags {
    if !metadata.tags.contains(&tag) {
      metadata.tags.push(tag);
    }
  }
  data.model_card_summary = card.summary;
}

/// Scrape one model: its page, then its card.
///
/// A page failure fails the model. A card failure only loses the card's
/// fields.
pub async fn scrape_model(hub: &HubClient, model_id: &str) -> Result<ModelData> {
  let html = hub.model_page(model_id).await?;
  let mut data = model_data_from_html(hub.extractor(), model_id, &html)?;

  match hub.model_card(model_id).await {
    Ok(card) => apply_card(&mut data, card),
    Err(e) => warn!(model = model_id, err = %e, "Model card unavailable"),
  }

  info!(
    model = model_id,
    benchmarks = data.benchmarks.len(),
    pipeline_tag = ?data.pipeline_tag,
    "Scraped model"
  );
  Ok(data)
}

/// Scrape many models, at most `max_concurrent` at a time.
///
/// Results come back in input order. One model failing never affects the
/// others. `on_done` is called as each model finishes.
pub async fn scrape_batch<F>(
  hub: &HubClient,
  model_ids: &[String],
  max_concurrent: usize,
  on_done: F,
) -> Vec<(String, Result<ModelData>)>
where
  F: Fn(&str, &Result<ModelData>),
{
  let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
  let on_done = &on_done;

  debug!(models = model_ids.len(), max_concurrent, "Starting batch scrape");

  let futures: Vec<_> = model_ids
    .iter()
    .map(|model_id| {
      let permit = semaphore.clone();
      async move {
        let result = match permit.acquire().await {
          Ok(_permit) => scrape_model(hub, model_id).await,
          Err(_) => Err(FetchError::Network("batch cancelled".to_string())),
        };
        on_done(model_id, &result);
        (model_id.clone(), result)
      }
    })
    .collect();

  let results = join_all(futures).await;

  let failed = results.iter().filter(|(_, r)| r.is_err()).count();
  info!(total = results.len(), failed, "Batch scrape finished");
  results
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::CannedPages;
  use claimcheck_core::ScraperConfig;
  use extract::BenchmarkCatalog;
  use pretty_assertions::assert_eq;
  use std::time::Duration;

  const PAGE: &str = r#"<html><body>
    <div class="model-header"><span data-testid="download-count">1.5M</span><span data-testid="like-count">2K</span></div>
    <a href="/models?pipeline_tag=text-generation">Text Generation</a>
    <table>
      <tr><th>Benchmark</th><th>Score</th></tr>
      <tr><td>MMLU (5-shot)</td><td>63.4</td></tr>
      <tr><td>HumanEval</td><td>29.9%</td></tr>
    </table>
  </body></html>"#;

  fn hub(pages: CannedPages) -> HubClient {
    let config = ScraperConfig {
      hub_url: "https://hub.test".to_string(),
      api_url: "https://hub.test/api".to_string(),
      ..ScraperConfig::default()
    };
    HubClient::new(Arc::new(pages), &config, BenchmarkCatalog::default())
  }

  #[tokio::test]
  async fn test_scrape_model() {
    let pages = CannedPages::new()
      .with_page("https://hub.test/org/model", PAGE)
      .with_page(
        "https://hub.test/org/model/raw/main/README.md",
        "---\nlicense: mit\ntags:\n- chat\n---\n\nA chat model.\n",
      );
    let data = scrape_model(&hub(pages), "org/model").await.unwrap();

    assert_eq!(data.metadata.author, "org");
    assert_eq!(data.metadata.downloads, 1_500_000);
    assert_eq!(data.metadata.likes, 2_000);
    assert_eq!(data.pipeline_tag.as_deref(), Some("text-generation"));
    let scores: Vec<_> = data.benchmarks.iter().map(|b| (b.task(), b.value)).collect();
    assert_eq!(scores, vec![("mmlu", 63.4), ("humaneval", 29.9)]);
    assert_eq!(data.metadata.license.as_deref(), Some("mit"));
    assert!(data.metadata.tags.contains(&"chat".to_string()));
    assert_eq!(data.model_card_summary.as_deref(), Some("A chat model."));
  }

  #[tokio::test]
  async fn test_scrape_model_without_card() {
    let pages = CannedPages::new().with_page("https://hub.test/org/model", PAGE);
    let data = scrape_model(&hub(pages), "org/model").await.unwrap();
    assert_eq!(data.benchmarks.len(), 2);
    assert_eq!(data.model_card_summary, None);
  }

  #[tokio::test]
  async fn test_card_server_error_does_not_fail_model() {
    let pages = CannedPages::new()
      .with_page("https://hub.test/org/model", PAGE)
      .with_status("https://hub.test/org/model/raw/main/README.md", 500);
    assert!(scrape_model(&hub(pages), "org/model").await.is_ok());
  }

  #[tokio::test]
  async fn test_missing_page_fails() {
    let err = scrape_model(&hub(CannedPages::new()), "org/missing").await.unwrap_err();
    assert!(err.is_not_found());
  }

  #[tokio::test]
  async fn test_batch_keeps_order_and_isolates_failures() {
    let pages = CannedPages::new()
      .with_page("https://hub.test/a/one", PAGE)
      .with_delay("https://hub.test/a/one", Duration::from_millis(30))
      .with_page("https://hub.test/a/three", PAGE)
      .with_status("https://hub.test/a/two", 500);
    let ids = vec!["a/one".to_string(), "a/two".to_string(), "a/three".to_string()];

    let done = std::sync::Mutex::new(Vec::new());
    let results = scrape_batch(&hub(pages), &ids, 4, |id, result| {
      done.lock().unwrap().push((id.to_string(), result.is_ok()));
    })
    .await;

    let summary: Vec<_> = results.iter().map(|(id, r)| (id.as_str(), r.is_ok())).collect();
    assert_eq!(summary, vec![("a/one", true), ("a/two", false), ("a/three", true)]);
    assert_eq!(done.lock().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn test_batch_respects_concurrency_limit() {
    let mut pages = CannedPages::new();
    let ids: Vec<String> = (0..6).map(|i| format!("org/m{i}")).collect();
    for id in &ids {
      let url = format!("https://hub.test/{id}");
      pages = pages.with_page(&url, PAGE).with_delay(&url, Duration::from_millis(10));
    }
    let pages = Arc::new(pages);
    let config = ScraperConfig {
      hub_url: "https://hub.test".to_string(),
      ..ScraperConfig::default()
    };
    let hub = HubClient::new(pages.clone(), &config, BenchmarkCatalog::default());

    let results = scrape_batch(&hub, &ids, 2, |_, _| {}).await;
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert!(pages.max_in_flight() <= 2);
  }

  #[tokio::test]
  async fn test_empty_batch() {
    let results = scrape_batch(&hub(CannedPages::new()), &[], 4, |_, _| {}).await;
    assert!(results.is_empty());
  }
}
