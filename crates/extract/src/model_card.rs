//! Model card (README) parsing.
//!
//! Model cards open with a YAML front matter block. Only a handful of flat
//! keys are read, with regexes rather than a YAML parser, and the first prose
//! paragraph after the front matter becomes the card summary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use parser::text::collapse_whitespace;

static TAGS_BLOCK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"tags:\s*\n((?:[ \t]*-[ \t]*.+\n)+)").expect("Invalid tags block regex"));

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-[ \t]*(.+)").expect("Invalid list item regex"));

static LANGUAGE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"language:\s*(?:-[ \t]*)?([\w-]+)").expect("Invalid language regex"));

static LICENSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"license:\s*([\w.-]+)").expect("Invalid license regex"));

static LIBRARY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"library_name:\s*([\w.-]+)").expect("Invalid library regex"));

/// Fields read from a model card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
  pub model_id: String,
  pub language: Option<String>,
  pub license: Option<String>,
  pub library_name: Option<String>,
  pub tags: Vec<String>,
  /// First paragraph of prose after the front matter
  pub summary: Option<String>,
}

impl ModelCard {
  /// An empty card, used when a model has no README.
  pub fn empty(model_id: &str) -> Self {
    Self {
      model_id: model_id.to_string(),
      ..Self::default()
    }
  }
}

/// Parse README content into a [`ModelCard`].
pub fn parse_model_card(model_id: &str, content: &str) -> ModelCard {
  let content = content.replace("\r\n", "\n");
  let (front_matter, body) = split_front_matter(&content);
  // Without front matter the keys may appear anywhere in the document
  let header = front_matter.unwrap_or(&content);
  let header = format!("{}\n", header);

  let tags = TAGS_BLOCK
    .captures(&header)
    .and_then(|caps| caps.get(1))
    .map(|block| {
      LIST_ITEM
        .captures_iter(block.as_str())
        .filter_map(|item| item.get(1))
        .map(|m| unquote(m.as_str()))
        .filter(|tag| !tag.is_empty())
        .collect()
    })
    .unwrap_or_default();

  ModelCard {
    model_id: model_id.to_string(),
    language: first_capture(&LANGUAGE, &header),
    license: first_capture(&LICENSE, &header),
    library_name: first_capture(&LIBRARY, &header),
    tags,
    summary: first_paragraph(body),
  }
}

fn split_front_matter(content: &str) -> (Option<&str>, &str) {
  let Some(rest) = content.strip_prefix("---\n") else {
    return (None, content);
  };
  match rest.find("\n---") {
    Some(end) => {
      let after = &rest[end + 4..];
      let body = after.split_once('\n').map(|(_, body)| body).unwrap_or("");
      (Some(&rest[..end]), body)
    }
    None => (None, content),
  }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
  pattern
    .captures(text)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_string())
}

fn unquote(value: &str) -> String {
  value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// First block of text that is not a heading, HTML, an image or a fence.
fn first_paragraph(body: &str) -> Option<String> {
  body
    .split("\n\n")
    .map(str::trim)
    .find(|block| {
      !block.is_empty()
        && !block.starts_with('#')
        && !block.starts_with('<')
        && !block.starts_with("![")
        && !block.starts_with("```")
        && !block.starts_with('|')
    })
    .map(collapse_whitespace)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const CARD: &str = "---
language: en
license: apache-2.0
library_name: transformers
tags:
- text-generation
- \"llama\"
  - pytorch
pipeline_tag: text-generation
---

# Llama 2

![banner](banner.png)

Llama 2 is a collection of pretrained
and fine-tuned generative text models.

## Usage
";

  #[test]
  fn test_front_matter_fields() {
    let card = parse_model_card("meta-llama/Llama-2-7b", CARD);
    assert_eq!(card.language.as_deref(), Some("en"));
    assert_eq!(card.license.as_deref(), Some("apache-2.0"));
    assert_eq!(card.library_name.as_deref(), Some("transformers"));
    assert_eq!(card.tags, vec!["text-generation", "llama", "pytorch"]);
  }

  #[test]
  fn test_summary_skips_headings_and_images() {
    let card = parse_model_card("m", CARD);
    assert_eq!(
      card.summary.as_deref(),
      Some("Llama 2 is a collection of pretrained and fine-tuned generative text models.")
    );
  }

  #[test]
  fn test_language_list() {
    let card = parse_model_card("m", "---\nlanguage:\n- fr\n- en\n---\n");
    assert_eq!(card.language.as_deref(), Some("fr"));
  }

  #[test]
  fn test_tags_at_end_of_front_matter() {
    let card = parse_model_card("m", "---\ntags:\n- a\n- b\n---\nBody");
    assert_eq!(card.tags, vec!["a", "b"]);
    assert_eq!(card.summary.as_deref(), Some("Body"));
  }

  #[test]
  fn test_no_front_matter() {
    let card = parse_model_card("m", "Some model.\r\n\r\nlicense: mit\r\n");
    assert_eq!(card.license.as_deref(), Some("mit"));
    assert_eq!(card.summary.as_deref(), Some("Some model."));
    assert!(card.tags.is_empty());
  }

  #[test]
  fn test_empty_card() {
    assert_eq!(parse_model_card("m", ""), ModelCard::empty("m"));
  }
}
