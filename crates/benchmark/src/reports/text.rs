//! Plain text report.

use std::fmt::Write as _;

use crate::comparison::BenchmarkComparison;

pub(super) fn render(comparisons: &[BenchmarkComparison]) -> String {
  let rule = "=".repeat(60);
  let mut out = String::new();

  let _ = writeln!(out, "{rule}");
  let _ = writeln!(out, "BENCHMARK COMPARISON REPORT");
  let _ = writeln!(out, "{rule}");
  let _ = writeln!(out);

  for c in comparisons {
    let _ = writeln!(out, "Model: {}", c.model_id);
    let _ = writeln!(out, "Task: {}", c.task);
    let _ = writeln!(out, "Reported: {}", c.reported_value);
    let _ = writeln!(out, "Actual: {}", c.actual_value);
    let _ = writeln!(out, "Difference: {:.2}%", c.difference_pct);
    let _ = writeln!(out, "Status: {}", if c.is_overclaimed { "OVERCLAIMED" } else { "OK" });
    let _ = writeln!(out, "{}", "-".repeat(40));
  }

  out.pop();
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_layout() {
    let comparisons = vec![
      BenchmarkComparison::new("org/model", "mmlu", "accuracy", 80.0, 74.0, 5.0),
      BenchmarkComparison::new("org/model", "mbpp", "pass@1", 40.0, 40.5, 5.0),
    ];
    let expected = format!(
      "{eq}\nBENCHMARK COMPARISON REPORT\n{eq}\n\n\
       Model: org/model\nTask: mmlu\nReported: 80\nActual: 74\nDifference: -7.50%\nStatus: OVERCLAIMED\n{dash}\n\
       Model: org/model\nTask: mbpp\nReported: 40\nActual: 40.5\nDifference: 1.25%\nStatus: OK\n{dash}",
      eq = "=".repeat(60),
      dash = "-".repeat(40),
    );
    assert_eq!(render(&comparisons), expected);
  }

  #[test]
  fn test_empty_report_has_header_only() {
    let expected = format!("{eq}\nBENCHMARK COMPARISON REPORT\n{eq}\n", eq = "=".repeat(60));
    assert_eq!(render(&[]), expected);
  }
}
