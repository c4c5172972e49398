//! Reported-versus-measured comparison command

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use benchmark::{ComparisonEngine, ComparisonReport, MeasuredScores, ReportFormat};
use clap::Args;
use tracing::{info, warn};

use super::Context;

#[derive(Args)]
pub struct CompareArgs {
  /// Measured scores file (JSON)
  #[arg(long, value_name = "FILE")]
  pub actual: PathBuf,

  /// Tasks to compare (default: comparison.default_tasks from config)
  #[arg(long, value_delimiter = ',')]
  pub tasks: Vec<String>,

  /// Compare every task the model reports
  #[arg(long, conflicts_with = "tasks")]
  pub all: bool,

  /// Overclaim threshold in percent (default: from config)
  #[arg(long)]
  pub threshold: Option<f64>,

  #[arg(short, long, default_value = "text", value_parser = ["text", "markdown", "md", "json"])]
  pub format: String,

  /// Write the report to a file instead of stdout
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,
}

/// Compare stored reported scores with measured ones.
///
/// Exits with failure when any compared task is overclaimed.
pub fn cmd_compare(ctx: &Context, model_id: &str, args: &CompareArgs) -> Result<ExitCode> {
  let format: ReportFormat = args.format.parse()?;
  let report = build_report(ctx, model_id, args)?;

  match &args.output {
    Some(path) => {
      report.save(path, format)?;
      println!("Saved report to {}", path.display());
    }
    None => println!("{}", report.render(format)?),
  }

  Ok(if report.summary.passes {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

fn build_report(ctx: &Context, model_id: &str, args: &CompareArgs) -> Result<ComparisonReport> {
  let store = ctx.store();
  let reported = store.load_reported(model_id, &ctx.catalog)?;
  if reported.is_empty() {
    warn!(
      model = model_id,
      data_dir = %store.data_dir().display(),
      "No reported benchmarks stored; run `claimcheck scrape` first"
    );
  }

  let measured = MeasuredScores::load(&args.actual, &ctx.catalog)
    .with_context(|| format!("Failed to load measured scores from {}", args.actual.display()))?;

  let threshold = args
    .threshold
    .unwrap_or(ctx.config.comparison.overclaim_threshold_pct);
  let engine = ComparisonEngine::new(threshold, ctx.catalog.clone());

  let tasks = if args.tasks.is_empty() {
    &ctx.config.comparison.default_tasks
  } else {
    &args.tasks
  };
  let comparisons = if args.all || tasks.is_empty() {
    engine.compare_model(model_id, &reported, &measured)
  } else {
    engine.compare_tasks(model_id, tasks, &reported, &measured)
  };

  if comparisons.is_empty() {
    warn!(model = model_id, "No task had both a reported and a measured score");
  }

  let summary = engine.summarize(&comparisons);
  info!(
    model = model_id,
    total = summary.total,
    overclaimed = summary.overclaimed,
    "Comparison finished"
  );
  Ok(ComparisonReport::new(comparisons, summary))
}
