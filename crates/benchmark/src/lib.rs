//! Benchmark claim checking
//!
//! Reconciles self-reported benchmark scores with independently measured ones.
//!
//! ## Key Concepts
//!
//! - **Comparison**: one reported score against one measured score for the same (model, task)
//! - **Actual sources**: where measured scores come from ([`ActualSource`])
//! - **Score store**: one JSON file per scraped model
//! - **Reports**: text, Markdown and JSON renderings of a comparison run

pub mod actual;
pub mod comparison;
pub mod reports;
pub mod store;

pub use actual::MeasuredScores;
pub use comparison::{
  ActualSource, BenchmarkComparison, ComparisonEngine, ComparisonSummary, DEFAULT_OVERCLAIM_THRESHOLD_PCT,
  WorstDeviation,
};
pub use reports::{ComparisonReport, ReportFormat, load_json as load_report};
pub use store::{ScoreStore, write_json};

use std::path::PathBuf;
use thiserror::Error;

/// Benchmark-specific errors
#[derive(Debug, Error)]
pub enum BenchmarkError {
  #[error("IO error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid JSON in {path}: {source}")]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("JSON error: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("Unknown report format: {0}")]
  UnknownFormat(String),
}

impl BenchmarkError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
    Self::Json {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
