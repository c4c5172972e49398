//! Reported-versus-actual comparison.

use std::collections::HashMap;

use claimcheck_core::{BenchmarkRecord, ComparisonConfig};
use extract::BenchmarkCatalog;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percentage by which actual may trail reported before a claim counts as overclaimed
pub const DEFAULT_OVERCLAIM_THRESHOLD_PCT: f64 = 5.0;

const OVERCLAIMED_NOTE: &str = "Overclaimed!";
const WITHIN_RANGE_NOTE: &str = "Within expected range";

/// One reported score reconciled against one measured score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
  pub model_id: String,
  pub task: String,
  pub metric: String,
  pub reported_value: f64,
  pub actual_value: f64,
  /// `actual - reported`
  pub difference: f64,
  /// `difference / reported * 100`, or 0 when nothing was reported
  pub difference_pct: f64,
  pub is_overclaimed: bool,
  pub notes: String,
}

impl BenchmarkComparison {
  pub fn new(model_id: &str, task: &str, metric: &str, reported: f64, actual: f64, threshold_pct: f64) -> Self {
    let difference = actual - reported;
    let difference_pct = if reported == 0.0 {
      0.0
    } else {
      difference / reported * 100.0
    };
    let is_overclaimed = difference_pct < -threshold_pct;

    Self {
      model_id: model_id.to_string(),
      task: task.to_string(),
      metric: metric.to_string(),
      reported_value: reported,
      actual_value: actual,
      difference,
      difference_pct,
      is_overclaimed,
      notes: if is_overclaimed {
        OVERCLAIMED_NOTE
      } else {
        WITHIN_RANGE_NOTE
      }
      .to_string(),
    }
  }
}

/// Where measured scores come from.
pub trait ActualSource {
  /// The measured record for a model's task, if one exists.
  fn actual(&self, model_id: &str, task: &str) -> Option<BenchmarkRecord>;
}

impl<F> ActualSource for F
where
  F: Fn(&str, &str) -> Option<BenchmarkRecord>,
{
  fn actual(&self, model_id: &str, task: &str) -> Option<BenchmarkRecord> {
    self(model_id, task)
  }
}

/// Measured records for a single model, keyed by task.
impl ActualSource for HashMap<String, BenchmarkRecord> {
  fn actual(&self, _model_id: &str, task: &str) -> Option<BenchmarkRecord> {
    self.get(task).cloned()
  }
}

/// Stateless comparison of reported record sets against an [`ActualSource`].
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
  threshold_pct: f64,
  catalog: BenchmarkCatalog,
}

impl Default for ComparisonEngine {
  fn default() -> Self {
    Self::new(DEFAULT_OVERCLAIM_THRESHOLD_PCT, BenchmarkCatalog::default())
  }
}

impl ComparisonEngine {
  pub fn new(threshold_pct: f64, catalog: BenchmarkCatalog) -> Self {
    Self { threshold_pct, catalog }
  }

  pub fn from_config(config: &ComparisonConfig, catalog: BenchmarkCatalog) -> Self {
    Self::new(config.overclaim_threshold_pct, catalog)
  }

  pub fn threshold_pct(&self) -> f64 {
    self.threshold_pct
  }

  /// Compare one reported record against one actual record.
  pub fn compare(&self, model_id: &str, reported: &BenchmarkRecord, actual: &BenchmarkRecord) -> BenchmarkComparison {
    let task = reported.task();
    BenchmarkComparison::new(
      model_id,
      task,
      self.catalog.metric_for(task),
      reported.value,
      actual.value,
      self.threshold_pct,
    )
  }

  /// Compare every task present in `reported`, in order of first appearance.
  ///
  /// Tasks the source has no measurement for are skipped.
  pub fn compare_model(
    &self,
    model_id: &str,
    reported: &[BenchmarkRecord],
    source: &impl ActualSource,
  ) -> Vec<BenchmarkComparison> {
    let mut tasks: Vec<&str> = Vec::new();
    for record in reported {
      if !tasks.contains(&record.task()) {
        tasks.push(record.task());
      }
    }
    self.compare_each(model_id, &tasks, reported, source)
  }

  /// Compare an explicit list of tasks, in the order given.
  ///
  /// Tasks with no reported record or no measurement are skipped.
  pub fn compare_tasks<S: AsRef<str>>(
    &self,
    model_id: &str,
    tasks: &[S],
    reported: &[BenchmarkRecord],
    source: &impl ActualSource,
  ) -> Vec<BenchmarkComparison> {
    let tasks: Vec<&str> = tasks.iter().map(|t| t.as_ref()).collect();
    self.compare_each(model_id, &tasks, reported, source)
  }

  fn compare_each(
    &self,
    model_id: &str,
    tasks: &[&str],
    reported: &[BenchmarkRecord],
    source: &impl ActualSource,
  ) -> Vec<BenchmarkComparison> {
    tasks
      .iter()
      .filter_map(|task| {
        // Last record for a task wins
        let claim = reported.iter().rev().find(|r| r.task() == *task)?;
        let Some(actual) = source.actual(model_id, task) else {
          debug!(model = model_id, task, "No measured score, skipping");
          return None;
        };
        Some(self.compare(model_id, claim, &actual))
      })
      .collect()
  }

  /// Deviation statistics over a set of comparisons.
  pub fn summarize(&self, comparisons: &[BenchmarkComparison]) -> ComparisonSummary {
    ComparisonSummary::from_comparisons(comparisons, self.threshold_pct)
  }
}

/// The largest shortfall in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstDeviation {
  pub model_id: String,
  pub task: String,
  pub difference_pct: f64,
}

/// Aggregate statistics over a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
  /// Comparisons made
  pub total: usize,
  /// Comparisons flagged as overclaimed
  pub overclaimed: usize,
  /// Comparisons within the threshold
  pub within_range: usize,
  /// Mean percentage difference (0 for an empty run)
  pub mean_difference_pct: f64,
  /// Most negative percentage difference
  pub worst: Option<WorstDeviation>,
  /// Threshold the run was judged against
  pub threshold_pct: f64,
  /// Whether nothing was overclaimed
  pub passes: bool,
}

impl ComparisonSummary {
  pub fn from_comparisons(comparisons: &[BenchmarkComparison], threshold_pct: f64) -> Self {
    let total = comparisons.len();
    let overclaimed = comparisons.iter().filter(|c| c.is_overclaimed).count();
    let mean_difference_pct = if total == 0 {
      0.0
    } else {
      comparisons.iter().map(|c| c.difference_pct).sum::<f64>() / total as f64
    };

    let worst = comparisons
      .iter()
      .min_by(|a, b| a.difference_pct.total_cmp(&b.difference_pct))
      .map(|c| WorstDeviation {
        model_id: c.model_id.clone(),
        task: c.task.clone(),
        difference_pct: c.difference_pct,
      });

    Self {
      total,
      overclaimed,
      within_range: total - overclaimed,
      mean_difference_pct,
      worst,
      threshold_pct,
      passes: overclaimed == 0,
    }
  }
}
