//! Model hub commands: scrape, batch, popular, info

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use benchmark::{ScoreStore, write_json};
use claimcheck_core::{ModelData, ModelExport};
use fetch::{HubClient, ModelSearch, scrape_batch, scrape_model};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use super::{Context, format_count, truncate};

/// Scrape a single model and store its data
pub async fn cmd_scrape(ctx: &Context, model_id: &str, output: Option<&Path>, json: bool) -> Result<()> {
  let hub = ctx.hub()?;
  let data = scrape_model(&hub, model_id)
    .await
    .with_context(|| format!("Failed to scrape {model_id}"))?;

  let path = ctx.store().save(&data)?;
  if let Some(output) = output {
    write_json(output, &data.to_export())?;
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&data.to_export())?);
    return Ok(());
  }

  print_model(&data);
  println!();
  println!("Saved to {}", path.display());
  if let Some(output) = output {
    println!("Saved to {}", output.display());
  }
  Ok(())
}

fn print_model(data: &ModelData) {
  let meta = &data.metadata;
  println!("Model:     {}", meta.name);
  println!("Author:    {}", meta.author);
  println!("Downloads: {}", format_count(meta.downloads));
  println!("Likes:     {}", format_count(meta.likes));
  if let Some(pipeline) = &data.pipeline_tag {
    println!("Pipeline:  {}", pipeline);
  }
  if let Some(license) = &meta.license {
    println!("License:   {}", license);
  }

  if data.benchmarks.is_empty() {
    println!();
    println!("No benchmarks found on page");
    return;
  }

  println!();
  println!("Benchmarks found: {}", data.benchmarks.len());
  println!("{:<32} {:>10} {:<12} {:>5}", "BENCHMARK", "SCORE", "TASK", "SHOTS");
  for b in &data.benchmarks {
    let shots = b.shots.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
    println!("{:<32} {:>10} {:<12} {:>5}", truncate(&b.name, 32), b.value, b.task(), shots);
  }
}

/// Model ids from arguments plus an optional file, deduplicated in order.
fn collect_model_ids(mut ids: Vec<String>, from: Option<&Path>) -> Result<Vec<String>> {
  if let Some(path) = from {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ids.extend(
      content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string),
    );
  }

  let mut unique = Vec::with_capacity(ids.len());
  for id in ids {
    if !unique.contains(&id) {
      unique.push(id);
    }
  }
  Ok(unique)
}

struct BatchFailure<'a> {
  model_id: &'a str,
  error: String,
}

/// Save each scraped model; a failed scrape or save only affects its own model.
fn persist_results<'a>(
  store: &ScoreStore,
  results: &'a [(String, fetch::Result<ModelData>)],
) -> (Vec<ModelExport>, Vec<BatchFailure<'a>>) {
  let mut exports = Vec::new();
  let mut failures = Vec::new();
  for (model_id, result) in results {
    let saved = match result {
      Ok(data) => store.save(data).map(|_| data.to_export()).map_err(|e| e.to_string()),
      Err(e) => Err(e.to_string()),
    };
    match saved {
      Ok(export) => exports.push(export),
      Err(error) => failures.push(BatchFailure { model_id, error }),
    }
  }
  (exports, failures)
}

/// Scrape many models with a progress bar; returns the successes.
async fn run_batch(ctx: &Context, hub: &HubClient, model_ids: &[String]) -> Result<Vec<ModelExport>> {
  let pb = ProgressBar::new(model_ids.len() as u64);
  pb.set_style(
    ProgressStyle::default_bar()
      .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
      .progress_chars("#>-"),
  );

  let results = scrape_batch(hub, model_ids, ctx.config.scraper.max_concurrent, |model_id, _| {
    pb.set_message(model_id.to_string());
    pb.inc(1);
  })
  .await;
  pb.finish_and_clear();

  let (exports, failures) = persist_results(&ctx.store(), &results);
  if !failures.is_empty() {
    warn!(failed = failures.len(), "Some models failed to scrape");
    for failure in &failures {
      println!("  ✗ {}: {}", failure.model_id, failure.error);
    }
  }
  Ok(exports)
}

/// Scrape several models and write the combined results
pub async fn cmd_batch(ctx: &Context, model_ids: Vec<String>, from: Option<&Path>, output: &Path) -> Result<()> {
  let model_ids = collect_model_ids(model_ids, from)?;
  if model_ids.is_empty() {
    bail!("No model ids given");
  }

  println!("Scraping {} models...", model_ids.len());
  let hub = ctx.hub()?;
  let exports = run_batch(ctx, &hub, &model_ids).await?;

  write_json(output, &exports)?;
  println!(
    "Done! Scraped {}/{} models, saved to {}",
    exports.len(),
    model_ids.len(),
    output.display()
  );
  Ok(())
}

/// List popular models, optionally scraping each one
pub async fn cmd_popular(
  ctx: &Context,
  limit: usize,
  pipeline: Option<&str>,
  output: &Path,
  scrape: bool,
) -> Result<()> {
  let hub = ctx.hub()?;
  let mut search = ModelSearch::popular(limit);
  if let Some(tag) = pipeline {
    search = search.with_pipeline_tag(tag);
  }
  let models = hub.search_models(&search).await.context("Failed to list models")?;

  write_json(output, &models)?;
  info!(count = models.len(), path = %output.display(), "Saved popular models");

  println!("{:>4}  {:<48} {:>14} {:>8}  PIPELINE", "#", "MODEL", "DOWNLOADS", "LIKES");
  for (rank, model) in models.iter().enumerate() {
    println!(
      "{:>4}  {:<48} {:>14} {:>8}  {}",
      rank + 1,
      truncate(model.model_id(), 48),
      format_count(model.downloads),
      format_count(model.likes),
      model.pipeline_tag.as_deref().unwrap_or("-")
    );
  }
  println!();
  println!("Saved {} models to {}", models.len(), output.display());

  if scrape && !models.is_empty() {
    let ids: Vec<String> = models.iter().map(|m| m.model_id().to_string()).collect();
    let exports = run_batch(ctx, &hub, &ids).await?;
    println!(
      "Scraped {}/{} models into {}",
      exports.len(),
      ids.len(),
      ctx.config.storage.data_dir.display()
    );
  }
  Ok(())
}

#[derive(Serialize)]
struct ModelInfo {
  model: fetch::HubModel,
  card: extract::ModelCard,
}

/// Show hub API details and the model card
pub async fn cmd_info(ctx: &Context, model_id: &str, json: bool) -> Result<()> {
  let hub = ctx.hub()?;
  let model = match hub.model_info(model_id).await {
    Ok(model) => model,
    Err(e) if e.is_not_found() => bail!("Model not found: {model_id}"),
    Err(e) => return Err(anyhow::Error::new(e).context("Failed to fetch model info")),
  };
  let card = hub.model_card(model_id).await?;

  if json {
    println!("{}", serde_json::to_string_pretty(&ModelInfo { model, card })?);
    return Ok(());
  }

  println!("Model:         {}", model.model_id());
  println!("Downloads:     {}", format_count(model.downloads));
  println!("Likes:         {}", format_count(model.likes));
  println!("Pipeline:      {}", model.pipeline_tag.as_deref().unwrap_or("-"));
  println!("Library:       {}", card.library_name.as_deref().or(model.library_name.as_deref()).unwrap_or("-"));
  println!("License:       {}", card.license.as_deref().or(model.license()).unwrap_or("-"));
  println!("Language:      {}", card.language.as_deref().unwrap_or("-"));
  println!("Last modified: {}", model.last_modified.as_deref().unwrap_or("-"));
  if !model.tags.is_empty() {
    println!("Tags:          {}", model.tags.join(", "));
  }
  if let Some(summary) = &card.summary {
    println!();
    println!("{}", summary);
  }
  Ok(())
}
