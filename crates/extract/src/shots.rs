use regex::Regex;
use std::sync::LazyLock;

static SHOT_SUFFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)(\d+)[_-]shot").expect("Invalid shot suffix regex"));

static SHOT_SPACED: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)(\d+)[\s-]*shot").expect("Invalid spaced shot regex"));

static SHOT_PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)shot[_\s]*(\d+)").expect("Invalid shot prefix regex"));

/// Few-shot count embedded in a benchmark label ("5-shot", "0 shot", "shot_3").
///
/// Patterns are tried in order and the first one that matches wins.
pub fn extract_num_shots(label: &str) -> Option<u32> {
  [&*SHOT_SUFFIX, &*SHOT_SPACED, &*SHOT_PREFIX]
    .into_iter()
    .find_map(|pattern| pattern.captures(label))
    .and_then(|caps| caps.get(1))
    .and_then(|m| m.as_str().parse().ok())
}
