//! Property tests for numeric parsing and label matching.

use extract::{BenchmarkCatalog, extract_num_shots, parse_count, parse_score};
use proptest::prelude::*;

proptest! {
  #[test]
  fn count_suffix_scales_whole_numbers(n in 0u64..1_000_000) {
    prop_assert_eq!(parse_count(&format!("{n}K")), n * 1_000);
    prop_assert_eq!(parse_count(&format!("{n}m")), n * 1_000_000);
    prop_assert_eq!(parse_count(&format!("{n}B")), n * 1_000_000_000);
  }

  #[test]
  fn count_suffix_scales_decimals_exactly(whole in 0u64..10_000, tenths in 0u64..10) {
    prop_assert_eq!(parse_count(&format!("{whole}.{tenths}M")), whole * 1_000_000 + tenths * 100_000);
  }

  #[test]
  fn count_ignores_thousands_separators(n in 0u64..1_000_000_000) {
    let digits = n.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
      if i > 0 && (digits.len() - i) % 3 == 0 {
        grouped.push(',');
      }
      grouped.push(c);
    }
    prop_assert_eq!(parse_count(&grouped), n);
  }

  #[test]
  fn trailing_percent_does_not_rescale(value in -1000.0f64..1000.0) {
    let plain = parse_score(&value.to_string());
    prop_assert_eq!(plain, Some(value));
    prop_assert_eq!(parse_score(&format!("{value}%")), plain);
  }

  #[test]
  fn scores_are_always_finite(text in ".{0,16}") {
    if let Some(value) = parse_score(&text) {
      prop_assert!(value.is_finite());
    }
  }

  #[test]
  fn dash_shot_labels_yield_their_count(n in 0u32..1000, name in "[a-z]{2,8}") {
    prop_assert_eq!(extract_num_shots(&format!("{name} {n}-shot")), Some(n));
  }

  #[test]
  fn matching_ignores_case(label in "[a-zA-Z0-9 ()-]{0,24}") {
    let catalog = BenchmarkCatalog::default();
    prop_assert_eq!(catalog.match_task(&label), catalog.match_task(&label.to_uppercase()));
  }
}
