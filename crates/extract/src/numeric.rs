//! Free-form numeric text: popularity counts ("1.2M") and scores ("75.3%").

/// Unit suffixes, checked in order
const COUNT_SUFFIXES: &[(char, u64)] = &[('K', 1_000), ('M', 1_000_000), ('B', 1_000_000_000)];

/// Fraction digits beyond this cannot contribute a whole unit at the largest suffix
const MAX_FRACTION_DIGITS: usize = 9;

/// Parse a count such as `"1,234"`, `"500K"` or `"1.2M"`.
///
/// Whitespace and thousands separators are ignored. A single trailing K/M/B
/// suffix (any case) scales the prefix exactly; any remainder below one unit is
/// truncated. Returns 0 when nothing parses.
pub fn parse_count(text: &str) -> u64 {
  let cleaned: String = text
    .chars()
    .filter(|c| !c.is_whitespace() && *c != ',')
    .collect::<String>()
    .to_ascii_uppercase();

  for &(suffix, multiplier) in COUNT_SUFFIXES {
    if let Some(prefix) = cleaned.strip_suffix(suffix)
      && let Some(value) = scale_decimal(prefix, multiplier)
    {
      return value;
    }
  }

  cleaned.parse::<u64>().unwrap_or(0)
}

/// `prefix * multiplier` computed on the decimal digits, without float rounding.
fn scale_decimal(prefix: &str, multiplier: u64) -> Option<u64> {
  let prefix = prefix.strip_prefix('+').unwrap_or(prefix);
  let (whole, fraction) = prefix.split_once('.').unwrap_or((prefix, ""));

  if whole.is_empty() && fraction.is_empty() {
    return None;
  }
  if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }

  let whole_value = if whole.is_empty() { 0 } else { whole.parse::<u64>().ok()? };
  let scaled_whole = whole_value.checked_mul(multiplier)?;

  let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
  let scaled_fraction = if fraction.is_empty() {
    0
  } else {
    let digits = fraction.parse::<u64>().ok()?;
    let denominator = 10u64.pow(fraction.len() as u32);
    digits.checked_mul(multiplier)? / denominator
  };

  scaled_whole.checked_add(scaled_fraction)
}

/// Parse a benchmark score such as `"75.3%"` or `"0.753"`.
///
/// A trailing percent sign is dropped without rescaling. Returns `None` for
/// anything that is not a finite number.
pub fn parse_score(text: &str) -> Option<f64> {
  let trimmed = text.trim();
  let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
  let value = number.parse::<f64>().ok()?;
  value.is_finite().then_some(value)
}
