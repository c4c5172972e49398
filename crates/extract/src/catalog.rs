//! Benchmark name catalog
//!
//! An explicit priority list: labels are lowercased and matched by substring
//! containment against each entry's aliases, top to bottom, first hit wins.
//! An alias only counts at a word boundary: it may not follow a letter or
//! digit, nor run into a following letter ("dropout" is not DROP, "search"
//! is not ARC).
//! Entries whose aliases contain a shorter entry's alias must come first
//! ("mmlu-pro" before "mmlu", "superglue" before "glue"), and the generic
//! "arc" stays last.

use claimcheck_core::{CatalogConfig, CatalogEntryConfig};

pub const DEFAULT_METRIC: &str = "accuracy";

/// A known benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
  /// Canonical task key
  pub key: String,
  /// Lowercase substrings that identify the benchmark
  pub aliases: Vec<String>,
  pub display_name: String,
  /// Metric the benchmark is usually reported in
  pub metric: String,
}

impl CatalogEntry {
  fn builtin(key: &str, display_name: &str, metric: &str, aliases: &[&str]) -> Self {
    Self {
      key: key.to_string(),
      aliases: aliases.iter().map(|a| a.to_string()).collect(),
      display_name: display_name.to_string(),
      metric: metric.to_string(),
    }
  }

  /// Whether any alias occurs at a word boundary in an already-lowercased label.
  fn matches_lowercase(&self, lower: &str) -> bool {
    self.aliases.iter().any(|alias| contains_word(lower, alias))
  }
}

impl From<&CatalogEntryConfig> for CatalogEntry {
  fn from(config: &CatalogEntryConfig) -> Self {
    let key = config.key.trim().to_lowercase();
    let mut aliases: Vec<String> = config
      .aliases
      .iter()
      .map(|a| a.trim().to_lowercase())
      .filter(|a| !a.is_empty())
      .collect();
    if aliases.is_empty() {
      aliases.push(key.clone());
    }

    Self {
      display_name: config.display_name.clone().unwrap_or_else(|| key.clone()),
      metric: config.metric.clone().unwrap_or_else(|| DEFAULT_METRIC.to_string()),
      aliases,
      key,
    }
  }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
  if needle.is_empty() {
    return false;
  }
  haystack.match_indices(needle).any(|(start, _)| {
    let before = haystack[..start].chars().next_back();
    let after = haystack[start + needle.len()..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphabetic)
  })
}

fn builtin_entries() -> Vec<CatalogEntry> {
  vec![
    CatalogEntry::builtin("mmlupro", "MMLU-Pro", "accuracy", &["mmlupro", "mmlu-pro", "mmlu_pro", "mmlu pro"]),
    CatalogEntry::builtin("mmlu", "MMLU", "accuracy", &["mmlu"]),
    CatalogEntry::builtin("humaneval", "HumanEval", "pass@1", &["humaneval", "human-eval", "human eval"]),
    CatalogEntry::builtin("mbpp", "MBPP", "pass@1", &["mbpp"]),
    CatalogEntry::builtin("truthfulqa", "TruthfulQA", "accuracy", &["truthfulqa", "truthful-qa", "truthful qa"]),
    CatalogEntry::builtin("hellaswag", "HellaSwag", "accuracy", &["hellaswag"]),
    CatalogEntry::builtin("winogrande", "WinoGrande", "accuracy", &["winogrande"]),
    CatalogEntry::builtin("gsm8k", "GSM8K", "exact_match", &["gsm8k", "gsm-8k"]),
    CatalogEntry::builtin("drop", "DROP", "f1", &["drop"]),
    CatalogEntry::builtin("squad", "SQuAD", "f1", &["squad"]),
    CatalogEntry::builtin("superglue", "SuperGLUE", "accuracy", &["superglue", "super-glue", "super glue"]),
    CatalogEntry::builtin("glue", "GLUE", "accuracy", &["glue"]),
    CatalogEntry::builtin(
      "bbh",
      "BIG-Bench Hard",
      "accuracy",
      &["bbh", "big-bench hard", "big bench hard", "bigbench hard", "bigbench-hard"],
    ),
    CatalogEntry::builtin("bigbench", "BIG-Bench", "accuracy", &["bigbench", "big-bench", "big bench"]),
    CatalogEntry::builtin("agieval", "AGIEval", "accuracy", &["agieval"]),
    CatalogEntry::builtin("arc", "ARC", "accuracy", &["arc"]),
  ]
}

/// Ordered benchmark catalog used to resolve free-text labels.
#[derive(Debug, Clone)]
pub struct BenchmarkCatalog {
  entries: Vec<CatalogEntry>,
}

impl Default for BenchmarkCatalog {
  fn default() -> Self {
    Self::builtin()
  }
}

impl BenchmarkCatalog {
  /// The built-in catalog.
  pub fn builtin() -> Self {
    Self {
      entries: builtin_entries(),
    }
  }

  /// Built-in catalog with user entries checked first.
  pub fn from_config(config: &CatalogConfig) -> Self {
    Self::builtin().with_extra(&config.extra)
  }

  /// Prepend extra entries, keeping their relative order.
  pub fn with_extra(mut self, extra: &[CatalogEntryConfig]) -> Self {
    if extra.is_empty() {
      return self;
    }
    let mut entries: Vec<CatalogEntry> = extra.iter().map(CatalogEntry::from).collect();
    entries.append(&mut self.entries);
    self.entries = entries;
    self
  }

  pub fn entries(&self) -> &[CatalogEntry] {
    &self.entries
  }

  /// First entry whose alias occurs in the label.
  pub fn match_label(&self, label: &str) -> Option<&CatalogEntry> {
    let lower = label.to_lowercase();
    self.entries.iter().find(|entry| entry.matches_lowercase(&lower))
  }

  /// Canonical task key for a label, if any.
  pub fn match_task(&self, label: &str) -> Option<&str> {
    self.match_label(label).map(|entry| entry.key.as_str())
  }

  /// Look up an entry by canonical key.
  pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
    self.entries.iter().find(|entry| entry.key.eq_ignore_ascii_case(key))
  }

  /// Metric for a task key, defaulting to accuracy for unknown tasks.
  pub fn metric_for(&self, key: &str) -> &str {
    self.get(key).map(|entry| entry.metric.as_str()).unwrap_or(DEFAULT_METRIC)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_specific_before_general() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.match_task("mmlu-pro score"), Some("mmlupro"));
    assert_eq!(catalog.match_task("MMLU (5-shot)"), Some("mmlu"));
    assert_eq!(catalog.match_task("SuperGLUE"), Some("superglue"));
    assert_eq!(catalog.match_task("glue avg"), Some("glue"));
    assert_eq!(catalog.match_task("BIG-Bench Hard"), Some("bbh"));
    assert_eq!(catalog.match_task("big bench"), Some("bigbench"));
  }

  #[test]
  fn test_arc_is_last_resort() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.match_task("ARC-Challenge"), Some("arc"));
    assert_eq!(catalog.entries().last().map(|e| e.key.as_str()), Some("arc"));
  }

  #[test]
  fn test_unmatched() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.match_task("parameters"), None);
    assert_eq!(catalog.match_task(""), None);
  }

  #[test]
  fn test_aliases_inside_other_words_do_not_match() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.match_task("attention_dropout"), None);
    assert_eq!(catalog.match_task("search depth"), None);
    assert_eq!(catalog.match_task("architecture"), None);
    assert_eq!(catalog.match_task("march 2024"), None);
    assert_eq!(catalog.match_task("glueing"), None);
  }

  #[test]
  fn test_aliases_at_word_boundaries() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.match_task("drop (3-shot)"), Some("drop"));
    assert_eq!(catalog.match_task("arc_challenge"), Some("arc"));
    assert_eq!(catalog.match_task("arc (25-shot)"), Some("arc"));
    assert_eq!(catalog.match_task("openai_humaneval"), Some("humaneval"));
    assert_eq!(catalog.match_task("squad v2"), Some("squad"));
  }

  #[test]
  fn test_no_builtin_alias_is_shadowed() {
    // Every alias must resolve to its own entry, otherwise the ordering is wrong
    let catalog = BenchmarkCatalog::default();
    for entry in catalog.entries() {
      for alias in &entry.aliases {
        assert_eq!(catalog.match_task(alias), Some(entry.key.as_str()), "alias {alias}");
      }
    }
  }

  #[test]
  fn test_metrics() {
    let catalog = BenchmarkCatalog::default();
    assert_eq!(catalog.metric_for("humaneval"), "pass@1");
    assert_eq!(catalog.metric_for("gsm8k"), "exact_match");
    assert_eq!(catalog.metric_for("drop"), "f1");
    assert_eq!(catalog.metric_for("mmlu"), "accuracy");
    assert_eq!(catalog.metric_for("something-new"), "accuracy");
  }

  #[test]
  fn test_extra_entries_take_priority() {
    let extra = vec![
      CatalogEntryConfig {
        key: "MuSR".to_string(),
        aliases: vec![],
        display_name: None,
        metric: None,
      },
      CatalogEntryConfig {
        key: "mmlu-redux".to_string(),
        aliases: vec!["MMLU-Redux".to_string()],
        display_name: Some("MMLU-Redux".to_string()),
        metric: Some("accuracy".to_string()),
      },
    ];
    let catalog = BenchmarkCatalog::builtin().with_extra(&extra);

    assert_eq!(catalog.match_task("musr"), Some("musr"));
    assert_eq!(catalog.match_task("mmlu-redux 5-shot"), Some("mmlu-redux"));
    assert_eq!(catalog.match_task("mmlu"), Some("mmlu"));
    assert_eq!(catalog.get("musr").map(|e| e.display_name.as_str()), Some("musr"));
  }
}
