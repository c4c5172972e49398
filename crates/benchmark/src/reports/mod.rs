//! Report generation for comparison runs.
//!
//! - Text: the plain console report
//! - Markdown: human-readable summary with tables
//! - JSON: machine-readable, for CI

mod json;
mod markdown;
mod text;

pub use json::load as load_json;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comparison::{BenchmarkComparison, ComparisonSummary};
use crate::{BenchmarkError, Result};

/// Output format for a comparison report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
  #[default]
  Text,
  Markdown,
  Json,
}

impl FromStr for ReportFormat {
  type Err = BenchmarkError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "text" | "txt" => Ok(Self::Text),
      "markdown" | "md" => Ok(Self::Markdown),
      "json" => Ok(Self::Json),
      other => Err(BenchmarkError::UnknownFormat(other.to_string())),
    }
  }
}

/// A finished comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
  /// When the report was generated
  pub generated_at: DateTime<Utc>,
  /// Tool version
  pub version: String,
  /// Aggregate statistics
  pub summary: ComparisonSummary,
  /// One entry per compared (model, task)
  pub comparisons: Vec<BenchmarkComparison>,
}

impl ComparisonReport {
  pub fn new(comparisons: Vec<BenchmarkComparison>, summary: ComparisonSummary) -> Self {
    Self {
      generated_at: Utc::now(),
      version: env!("CARGO_PKG_VERSION").to_string(),
      summary,
      comparisons,
    }
  }

  /// Render in the requested format.
  pub fn render(&self, format: ReportFormat) -> Result<String> {
    match format {
      ReportFormat::Text => Ok(text::render(&self.comparisons)),
      ReportFormat::Markdown => Ok(markdown::render(self)),
      ReportFormat::Json => json::render(self),
    }
  }

  /// Render and write to a file.
  pub fn save(&self, path: &Path, format: ReportFormat) -> Result<()> {
    let content = self.render(format)?;
    std::fs::write(path, content).map_err(|e| BenchmarkError::io(path, e))
  }
}
