//! JSON report format.

use std::path::Path;

use super::ComparisonReport;
use crate::{BenchmarkError, Result};

pub(super) fn render(report: &ComparisonReport) -> Result<String> {
  Ok(serde_json::to_string_pretty(report)?)
}

/// Load a report previously written in JSON format.
pub fn load(path: &Path) -> Result<ComparisonReport> {
  let json = std::fs::read_to_string(path).map_err(|e| BenchmarkError::io(path, e))?;
  serde_json::from_str(&json).map_err(|e| BenchmarkError::json(path, e))
}
