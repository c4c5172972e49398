//! Research leaderboard commands: leaderboard, search-papers, paper

use std::path::Path;

use anyhow::{Context as _, Result};
use benchmark::write_json;

use super::{Context, truncate};

/// Print a task leaderboard, optionally saving it as JSON
pub async fn cmd_leaderboard(ctx: &Context, task: &str, output: Option<&Path>) -> Result<()> {
  let client = ctx.leaderboard()?;
  let entries = client
    .task_leaderboard(task)
    .await
    .with_context(|| format!("Failed to fetch leaderboard for {task}"))?;

  if entries.is_empty() {
    println!("No leaderboard entries found for {task}");
    return Ok(());
  }

  println!("{:>4}  {:<36} {:<20} {:>10} {:>6}", "#", "MODEL", "METRIC", "VALUE", "YEAR");
  for (rank, entry) in entries.iter().enumerate() {
    let year = entry.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
    println!(
      "{:>4}  {:<36} {:<20} {:>10} {:>6}",
      rank + 1,
      truncate(&entry.model, 36),
      truncate(&entry.metric, 20),
      entry.value,
      year
    );
  }

  let catalogued = entries.iter().filter_map(|e| e.to_record(&ctx.catalog)).count();
  println!();
  println!("{} entries, {} with parseable scores", entries.len(), catalogued);

  if let Some(output) = output {
    write_json(output, &entries)?;
    println!("Saved to {}", output.display());
  }
  Ok(())
}

/// Search papers by free text
pub async fn cmd_search_papers(ctx: &Context, query: &str, limit: usize) -> Result<()> {
  let client = ctx.leaderboard()?;
  let results = client.search_papers(query).await.context("Paper search failed")?;

  if results.is_empty() {
    println!("No papers found for \"{query}\"");
    return Ok(());
  }

  for (i, paper) in results.iter().take(limit).enumerate() {
    println!("{}. {}", i + 1, paper.title);
    println!("   {}", paper.url);
    if !paper.summary.is_empty() {
      println!("   {}", truncate(&paper.summary, 160));
    }
    println!();
  }
  Ok(())
}

/// Show one paper's details
pub async fn cmd_paper(ctx: &Context, paper: &str, json: bool) -> Result<()> {
  let client = ctx.leaderboard()?;
  let details = client
    .paper_details(paper)
    .await
    .with_context(|| format!("Failed to fetch paper {paper}"))?;

  if json {
    println!("{}", serde_json::to_string_pretty(&details)?);
    return Ok(());
  }

  println!("{}", details.title);
  println!("{}", details.url);
  if let Some(code) = &details.code_url {
    println!("Code: {}", code);
  }
  if !details.summary.is_empty() {
    println!();
    println!("{}", details.summary);
  }
  if !details.benchmarks.is_empty() {
    println!();
    println!("{:<36} {:<24} {:>10}", "METHOD", "METRIC", "VALUE");
    for b in &details.benchmarks {
      println!(
        "{:<36} {:<24} {:>10}",
        truncate(&b.method, 36),
        truncate(&b.metric, 24),
        b.value
      );
    }
  }
  Ok(())
}
