//! Markdown report generation.

use std::fmt::Write as _;

use super::ComparisonReport;

pub(super) fn render(report: &ComparisonReport) -> String {
  let mut out = String::new();
  let summary = &report.summary;

  let _ = writeln!(out, "# Benchmark Claim Check");
  let _ = writeln!(out);
  let _ = writeln!(
    out,
    "**Generated:** {}",
    report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
  );
  let _ = writeln!(out, "**Version:** {}", report.version);
  let _ = writeln!(out);

  let status = if summary.passes { "✅ PASS" } else { "❌ OVERCLAIMED" };
  let _ = writeln!(out, "## Summary: {}", status);
  let _ = writeln!(out);
  let _ = writeln!(out, "| Metric | Value |");
  let _ = writeln!(out, "|--------|-------|");
  let _ = writeln!(out, "| Compared | {} |", summary.total);
  let _ = writeln!(out, "| Overclaimed | {} |", summary.overclaimed);
  let _ = writeln!(out, "| Within range | {} |", summary.within_range);
  let _ = writeln!(out, "| Mean difference | {:+.2}% |", summary.mean_difference_pct);
  let _ = writeln!(out, "| Threshold | -{:.1}% |", summary.threshold_pct);
  if let Some(worst) = &summary.worst {
    let _ = writeln!(
      out,
      "| Worst | {} / {} ({:+.2}%) |",
      worst.model_id, worst.task, worst.difference_pct
    );
  }
  let _ = writeln!(out);

  if report.comparisons.is_empty() {
    let _ = writeln!(out, "_No tasks had both a reported and a measured score._");
    return out;
  }

  let _ = writeln!(out, "## Results");
  let _ = writeln!(out);
  let _ = writeln!(out, "| Model | Task | Metric | Reported | Actual | Difference | Status |");
  let _ = writeln!(out, "|-------|------|--------|----------|--------|------------|--------|");
  for c in &report.comparisons {
    let status = if c.is_overclaimed { "❌ OVERCLAIMED" } else { "✅ OK" };
    let _ = writeln!(
      out,
      "| {} | {} | {} | {:.2} | {:.2} | {:+.2}% | {} |",
      c.model_id, c.task, c.metric, c.reported_value, c.actual_value, c.difference_pct, status
    );
  }
  let _ = writeln!(out);

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::comparison::{BenchmarkComparison, ComparisonSummary};

  #[test]
  fn test_markdown_output() {
    let comparisons = vec![
      BenchmarkComparison::new("org/model", "mmlu", "accuracy", 80.0, 74.0, 5.0),
      BenchmarkComparison::new("org/model", "mbpp", "pass@1", 40.0, 41.0, 5.0),
    ];
    let summary = ComparisonSummary::from_comparisons(&comparisons, 5.0);
    let md = render(&ComparisonReport::new(comparisons, summary));

    assert!(md.contains("# Benchmark Claim Check"));
    assert!(md.contains("❌ OVERCLAIMED"));
    assert!(md.contains("| org/model | mmlu | accuracy | 80.00 | 74.00 | -7.50% | ❌ OVERCLAIMED |"));
    assert!(md.contains("| org/model | mbpp | pass@1 | 40.00 | 41.00 | +2.50% | ✅ OK |"));
    assert!(md.contains("| Worst | org/model / mmlu (-7.50%) |"));
  }

  #[test]
  fn test_empty_run() {
    let summary = ComparisonSummary::from_comparisons(&[], 5.0);
    let md = render(&ComparisonReport::new(Vec::new(), summary));
    assert!(md.contains("✅ PASS"));
    assert!(md.contains("No tasks had both"));
    assert!(!md.contains("## Results"));
  }
}
