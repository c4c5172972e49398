//! Model page extraction: benchmark tables, evaluation sections, pipeline tag and metadata.

use std::collections::HashSet;

use claimcheck_core::{BenchmarkRecord, ModelMetadata, RecordSet, normalize_label};
use parser::{Element, HtmlDocument};
use tracing::{debug, trace};

use crate::catalog::BenchmarkCatalog;
use crate::numeric::{parse_count, parse_score};
use crate::shots::extract_num_shots;

/// Class fragments that mark a block of evaluation results
const SECTION_CLASS_FRAGMENTS: &[&str] = &["benchmark", "evaluation", "metrics"];

/// Turns a model page into benchmark records.
#[derive(Debug, Clone, Default)]
pub struct PageBenchmarkExtractor {
  catalog: BenchmarkCatalog,
}

impl PageBenchmarkExtractor {
  pub fn new(catalog: BenchmarkCatalog) -> Self {
    Self { catalog }
  }

  pub fn catalog(&self) -> &BenchmarkCatalog {
    &self.catalog
  }

  /// Extract every recognizable benchmark score from the document.
  ///
  /// Tables are read first, then list-style evaluation sections. Records that
  /// share a `(task, dataset)` key keep the position of the first one and the
  /// value of the last one.
  pub fn extract(&self, doc: &HtmlDocument) -> RecordSet {
    let mut records = RecordSet::new();

    for table in doc.tables() {
      for cells in table.rows() {
        let [label_cell, value_cell, ..] = cells.as_slice() else {
          continue;
        };
        if let Some(record) = self.record_from_pair(&label_cell.text(), &value_cell.text()) {
          self.insert(&mut records, record);
        }
      }
    }

    for (label, value) in section_pairs(doc) {
      if let Some(record) = self.record_from_pair(&label, &value) {
        self.insert(&mut records, record);
      }
    }

    debug!(count = records.len(), "Extracted benchmark records");
    records
  }

  /// Build a record from a label and a raw value, or `None` if the label is
  /// not a known benchmark or the value does not parse.
  pub fn record_from_pair(&self, label: &str, raw_value: &str) -> Option<BenchmarkRecord> {
    let name = normalize_label(label);
    let task = self.catalog.match_task(&name)?;
    let Some(value) = parse_score(raw_value) else {
      trace!(label = %name, raw = raw_value, "Skipping unparseable score");
      return None;
    };

    Some(
      BenchmarkRecord::new(&name, value)
        .with_task(task)
        .with_shots(extract_num_shots(&name))
        .with_raw_text(raw_value.trim()),
    )
  }

  fn insert(&self, records: &mut RecordSet, record: BenchmarkRecord) {
    if let Some(previous) = records.insert(record) {
      trace!(name = %previous.name, old = previous.value, "Replaced duplicate benchmark row");
    }
  }
}

/// `label: value` pairs from list items and definition lists inside evaluation sections.
fn section_pairs(doc: &HtmlDocument) -> Vec<(String, String)> {
  let mut seen = HashSet::new();
  let mut pairs = Vec::new();

  let sections = doc
    .elements()
    .into_iter()
    .filter(|e| SECTION_CLASS_FRAGMENTS.iter().any(|f| e.has_class_containing(f)));

  for section in sections {
    for element in section.descendants() {
      // Nested sections would otherwise yield the same items twice
      if !seen.insert(element.start_byte()) {
        continue;
      }
      match element.tag_name().as_str() {
        "li" => {
          if let Some((label, value)) = element.text().rsplit_once(':') {
            pairs.push((label.trim().to_string(), value.trim().to_string()));
          }
        }
        "dl" => pairs.extend(definition_pairs(element)),
        _ => {}
      }
    }
  }

  pairs
}

fn definition_pairs(list: Element<'_>) -> Vec<(String, String)> {
  let mut pairs = Vec::new();
  let mut term: Option<String> = None;

  for child in list.children() {
    match child.tag_name().as_str() {
      "dt" => term = Some(child.text()),
      "dd" => {
        if let Some(label) = term.take() {
          pairs.push((label, child.text()));
        }
      }
      _ => {}
    }
  }

  pairs
}

/// The page's pipeline classification, from the first designated element in document order.
pub fn extract_pipeline_tag(doc: &HtmlDocument) -> Option<String> {
  doc.elements().into_iter().find_map(|element| {
    let tag = element.tag_name();
    if tag == "a" {
      element.attr("href").and_then(|href| pipeline_from_href(&href))
    } else if tag == "span" && element.has_class_containing("pipeline") {
      Some(element.text()).filter(|text| !text.is_empty())
    } else {
      None
    }
  })
}

fn pipeline_from_href(href: &str) -> Option<String> {
  if href.contains("/pipeline-tag/") {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    return path
      .trim_end_matches('/')
      .rsplit('/')
      .next()
      .filter(|segment| !segment.is_empty())
      .map(str::to_string);
  }

  let (_, rest) = href.split_once("pipeline_tag=")?;
  let value = rest.split(['&', '#']).next().unwrap_or(rest);
  (!value.is_empty()).then(|| value.to_string())
}

/// Identity and popularity signals shown on a model page.
pub fn extract_metadata(doc: &HtmlDocument, model_id: &str) -> ModelMetadata {
  let mut metadata = ModelMetadata::new(model_id);

  let by_test_id = |id: &str| doc.find_first("span", |e| e.attr("data-testid").as_deref() == Some(id));

  if let Some(downloads) = by_test_id("download-count") {
    metadata.downloads = parse_count(&downloads.text());
  }
  if let Some(likes) = by_test_id("like-count") {
    metadata.likes = parse_count(&likes.text());
  }

  if let Some(container) = doc.find_first("div", |e| e.has_class_containing("tags")) {
    metadata.tags = container
      .find_all("a")
      .into_iter()
      .filter(|a| a.has_class_containing("tag"))
      .map(|a| a.text())
      .filter(|text| !text.is_empty())
      .collect();
  }

  metadata.language = by_test_id("language").map(|e| e.text()).filter(|t| !t.is_empty());
  metadata.license = doc
    .find_first("a", |e| e.has_class_containing("license"))
    .map(|e| e.text())
    .filter(|t| !t.is_empty());

  metadata
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn doc(html: &str) -> HtmlDocument {
    HtmlDocument::parse(html).unwrap()
  }

  fn extract(html: &str) -> Vec<BenchmarkRecord> {
    PageBenchmarkExtractor::default().extract(&doc(html)).into_vec()
  }

  #[test]
  fn test_table_rows_become_records() {
    let records = extract(
      "<table><tr><th>Benchmark</th><th>Score</th></tr>
       <tr><td>MMLU (5-shot)</td><td>75.3%</td></tr>
       <tr><td>HumanEval</td><td>0.48</td></tr></table>",
    );

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "mmlu (5-shot)");
    assert_eq!(records[0].canonical_task.as_deref(), Some("mmlu"));
    assert_eq!(records[0].value, 75.3);
    assert_eq!(records[0].shots, Some(5));
    assert_eq!(records[0].raw_text.as_deref(), Some("75.3%"));
    assert_eq!(records[0].dataset, "mmlu (5-shot)");
    assert_eq!(records[1].canonical_task.as_deref(), Some("humaneval"));
    assert_eq!(records[1].shots, None);
  }

  #[test]
  fn test_unmatched_and_unparseable_rows_are_dropped() {
    let records = extract(
      "<table><tr><td>Parameters</td><td>7B</td></tr>
       <tr><td>GSM8K</td><td>pending</td></tr>
       <tr><td>Lonely cell</td></tr>
       <tr><td>Winogrande</td><td>78.1</td></tr></table>",
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].canonical_task.as_deref(), Some("winogrande"));
  }

  #[test]
  fn test_hyperparameter_rows_are_not_benchmarks() {
    let records = extract(
      "<table><tr><td>attention_dropout</td><td>0.1</td></tr>
       <tr><td>Search depth</td><td>3</td></tr>
       <tr><td>Architecture layers</td><td>32</td></tr></table>",
    );
    assert!(records.is_empty());
  }

  #[test]
  fn test_duplicate_rows_keep_the_later_value() {
    let records = extract(
      "<table><tr><td>MMLU</td><td>70.0</td></tr>
       <tr><td>GSM8K</td><td>50.0</td></tr>
       <tr><td>mmlu</td><td>71.5</td></tr></table>",
    );
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "mmlu");
    assert_eq!(records[0].value, 71.5);
    assert_eq!(records[1].name, "gsm8k");
  }

  #[test]
  fn test_extraction_is_idempotent() {
    let page = doc("<table><tr><td>MMLU</td><td>70</td></tr><tr><td>ARC</td><td>55</td></tr></table>");
    let extractor = PageBenchmarkExtractor::default();
    assert_eq!(extractor.extract(&page).into_vec(), extractor.extract(&page).into_vec());
  }

  #[test]
  fn test_section_lists_and_definitions() {
    let records = extract(
      r#"<div class="model-evaluation">
           <ul><li>HellaSwag (10-shot): 85.2</li><li>no colon here</li></ul>
           <dl><dt>TruthfulQA</dt><dd>44.9%</dd><dt>orphan</dt></dl>
         </div>
         <ul><li>MMLU: 99</li></ul>"#,
    );
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["hellaswag (10-shot)", "truthfulqa"]);
    assert_eq!(records[0].shots, Some(10));
    assert_eq!(records[1].value, 44.9);
  }

  #[test]
  fn test_nested_sections_do_not_duplicate() {
    let records = extract(
      r#"<section class="benchmarks"><div class="metrics"><ul><li>MBPP: 60</li></ul></div></section>"#,
    );
    assert_eq!(records.len(), 1);
  }

  #[test]
  fn test_sections_after_tables() {
    let records = extract(
      r#"<div class="benchmark"><ul><li>GSM8K: 40</li></ul></div>
         <table><tr><td>MMLU</td><td>60</td></tr></table>"#,
    );
    let tasks: Vec<_> = records.iter().map(|r| r.task()).collect();
    assert_eq!(tasks, vec!["mmlu", "gsm8k"]);
  }

  #[test]
  fn test_pipeline_tag_from_link() {
    let page = doc(r#"<a href="/models">x</a><a href="/pipeline-tag/text-generation">Text Generation</a>"#);
    assert_eq!(extract_pipeline_tag(&page).as_deref(), Some("text-generation"));
  }

  #[test]
  fn test_pipeline_tag_from_query() {
    let page = doc(r#"<a href="/models?pipeline_tag=fill-mask&sort=trending">Fill-Mask</a>"#);
    assert_eq!(extract_pipeline_tag(&page).as_deref(), Some("fill-mask"));
  }

  #[test]
  fn test_pipeline_tag_document_order() {
    let page = doc(r#"<span class="pipeline-badge">summarization</span><a href="/pipeline-tag/translation">t</a>"#);
    assert_eq!(extract_pipeline_tag(&page).as_deref(), Some("summarization"));
    assert_eq!(extract_pipeline_tag(&doc("<p>none</p>")), None);
  }

  #[test]
  fn test_metadata() {
    let page = doc(
      r#"<span data-testid="download-count">1.2M</span>
         <span data-testid="like-count">3,456</span>
         <div class="model-tags"><a class="tag">pytorch</a><a class="tag"> llama </a><a>skip</a></div>
         <span data-testid="language">English</span>
         <a class="license-link">apache-2.0</a>"#,
    );
    let metadata = extract_metadata(&page, "meta-llama/Llama-2-7b");

    assert_eq!(metadata.author, "meta-llama");
    assert_eq!(metadata.name, "Llama-2-7b");
    assert_eq!(metadata.downloads, 1_200_000);
    assert_eq!(metadata.likes, 3_456);
    assert_eq!(metadata.tags, vec!["pytorch", "llama"]);
    assert_eq!(metadata.language.as_deref(), Some("English"));
    assert_eq!(metadata.license.as_deref(), Some("apache-2.0"));
  }

  #[test]
  fn test_metadata_defaults() {
    let metadata = extract_metadata(&doc("<p>empty</p>"), "gpt2");
    assert_eq!(metadata.author, "unknown");
    assert_eq!(metadata.name, "gpt2");
    assert_eq!(metadata.downloads, 0);
    assert!(metadata.tags.is_empty());
    assert_eq!(metadata.license, None);
  }
}
