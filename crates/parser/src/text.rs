//! Text normalization helpers: entity decoding and whitespace collapsing.

/// Decode HTML character references (`&amp;`, `&#39;`, `&#x2013;`).
///
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(input: &str) -> String {
  if !input.contains('&') {
    return input.to_string();
  }

  let mut out = String::with_capacity(input.len());
  let mut rest = input;

  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    let body = &rest[amp + 1..];

    // References are short; anything longer than this is not one
    let terminator = body
      .char_indices()
      .take(32)
      .find(|(_, c)| *c == ';' || *c == '&' || c.is_whitespace());

    if let Some((idx, ';')) = terminator
      && let Some(decoded) = decode_reference(&body[..idx])
    {
      out.push(decoded);
      rest = &body[idx + 1..];
      continue;
    }

    out.push('&');
    rest = body;
  }

  out.push_str(rest);
  out
}

fn decode_reference(name: &str) -> Option<char> {
  if let Some(num) = name.strip_prefix('#') {
    let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
      u32::from_str_radix(hex, 16).ok()?
    } else {
      num.parse::<u32>().ok()?
    };
    return char::from_u32(code);
  }

  let c = match name {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "ndash" => '\u{2013}',
    "mdash" => '\u{2014}',
    "plusmn" => '\u{b1}',
    "times" => '\u{d7}',
    "middot" => '\u{b7}',
    _ => return None,
  };
  Some(c)
}

/// Collapse every run of whitespace (including non-breaking spaces) to a single space and trim.
pub fn collapse_whitespace(input: &str) -> String {
  input.split_whitespace().collect::<Vec<_>>().join(" ")
}
