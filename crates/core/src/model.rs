//! Benchmark records, model metadata and the JSON export shape.
//!
//! Records are plain values. A [`RecordSet`] keeps them unique per
//! `(task or name, dataset)` with last-write-wins semantics while preserving
//! the position of the first occurrence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One observed benchmark score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
  /// Label as found in the source, lowercased and trimmed
  pub name: String,
  /// Resolved catalog key, if the label matched one
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub canonical_task: Option<String>,
  /// Parsed score in the source's own scale
  pub value: f64,
  /// Source identifier the score was read from (defaults to `name`)
  pub dataset: String,
  /// Few-shot count, when the label carries one
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub shots: Option<u32>,
  /// Unparsed source text, kept for auditing
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub raw_text: Option<String>,
}

impl BenchmarkRecord {
  /// Create a record whose dataset defaults to its normalized name.
  pub fn new(name: &str, value: f64) -> Self {
    let name = normalize_label(name);
    Self {
      dataset: name.clone(),
      name,
      canonical_task: None,
      value,
      shots: None,
      raw_text: None,
    }
  }

  pub fn with_task(mut self, task: impl Into<String>) -> Self {
    self.canonical_task = Some(task.into());
    self
  }

  pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
    self.dataset = dataset.into();
    self
  }

  pub fn with_shots(mut self, shots: Option<u32>) -> Self {
    self.shots = shots;
    self
  }

  pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
    self.raw_text = Some(raw.into());
    self
  }

  /// Key used for deduplication: the canonical task (or name) plus dataset.
  pub fn key(&self) -> RecordKey {
    let primary = self.canonical_task.as_deref().unwrap_or(&self.name);
    (primary.to_string(), self.dataset.clone())
  }

  /// Task this record speaks for when compared: canonical task, else the name.
  pub fn task(&self) -> &str {
    self.canonical_task.as_deref().unwrap_or(&self.name)
  }
}

/// Lowercase and trim a free-text label.
pub fn normalize_label(label: &str) -> String {
  label.trim().to_lowercase()
}

pub type RecordKey = (String, String);

/// Ordered set of records keyed by [`BenchmarkRecord::key`].
///
/// Inserting a record whose key is already present replaces the stored
/// record in place.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
  records: Vec<BenchmarkRecord>,
  positions: HashMap<RecordKey, usize>,
}

impl RecordSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a record, returning the record it replaced (if any).
  pub fn insert(&mut self, record: BenchmarkRecord) -> Option<BenchmarkRecord> {
    let key = record.key();
    match self.positions.get(&key) {
      Some(&idx) => Some(std::mem::replace(&mut self.records[idx], record)),
      None => {
        self.positions.insert(key, self.records.len());
        self.records.push(record);
        None
      }
    }
  }

  pub fn get(&self, task: &str, dataset: &str) -> Option<&BenchmarkRecord> {
    self
      .positions
      .get(&(task.to_string(), dataset.to_string()))
      .map(|&idx| &self.records[idx])
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkRecord> {
    self.records.iter()
  }

  pub fn into_vec(self) -> Vec<BenchmarkRecord> {
    self.records
  }
}

impl FromIterator<BenchmarkRecord> for RecordSet {
  fn from_iter<I: IntoIterator<Item = BenchmarkRecord>>(iter: I) -> Self {
    let mut set = RecordSet::new();
    for record in iter {
      set.insert(record);
    }
    set
  }
}

impl IntoIterator for RecordSet {
  type Item = BenchmarkRecord;
  type IntoIter = std::vec::IntoIter<BenchmarkRecord>;

  fn into_iter(self) -> Self::IntoIter {
    self.records.into_iter()
  }
}

/// Identity and popularity signals for a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
  pub model_id: String,
  pub author: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_modified: Option<String>,
  #[serde(default)]
  pub downloads: u64,
  #[serde(default)]
  pub likes: u64,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license: Option<String>,
}

impl ModelMetadata {
  /// Metadata with author and name derived from the model id.
  pub fn new(model_id: &str) -> Self {
    let (author, name) = split_model_id(model_id);
    Self {
      model_id: model_id.to_string(),
      author,
      name,
      last_modified: None,
      downloads: 0,
      likes: 0,
      tags: Vec::new(),
      language: None,
      license: None,
    }
  }
}

/// Split `author/name`. Anything other than exactly two segments belongs to
/// the "unknown" author and keeps the whole id as its name.
pub fn split_model_id(model_id: &str) -> (String, String) {
  let parts: Vec<&str> = model_id.split('/').collect();
  if let [author, name] = parts.as_slice() {
    return (author.to_string(), name.to_string());
  }
  ("unknown".to_string(), model_id.to_string())
}

/// File name used to persist a model's data: slashes become underscores.
pub fn model_file_name(model_id: &str) -> String {
  format!("{}.json", model_id.replace('/', "_"))
}

/// Everything scraped for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
  pub metadata: ModelMetadata,
  pub benchmarks: Vec<BenchmarkRecord>,
  pub pipeline_tag: Option<String>,
  pub model_card_summary: Option<String>,
  pub scraped_at: DateTime<Utc>,
}

impl ModelData {
  pub fn new(metadata: ModelMetadata, benchmarks: Vec<BenchmarkRecord>, pipeline_tag: Option<String>) -> Self {
    Self {
      metadata,
      benchmarks,
      pipeline_tag,
      model_card_summary: None,
      scraped_at: Utc::now(),
    }
  }

  /// Convert to the persisted JSON shape.
  pub fn to_export(&self) -> ModelExport {
    ModelExport {
      model_id: self.metadata.model_id.clone(),
      author: self.metadata.author.clone(),
      name: self.metadata.name.clone(),
      downloads: self.metadata.downloads,
      likes: self.metadata.likes,
      pipeline_tag: self.pipeline_tag.clone(),
      benchmarks: self.benchmarks.iter().map(BenchmarkEntry::from).collect(),
      scraped_at: self.scraped_at,
    }
  }
}

/// Persisted form of [`ModelData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExport {
  pub model_id: String,
  pub author: String,
  pub name: String,
  #[serde(default)]
  pub downloads: u64,
  #[serde(default)]
  pub likes: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pipeline_tag: Option<String>,
  pub benchmarks: Vec<BenchmarkEntry>,
  pub scraped_at: DateTime<Utc>,
}

/// Persisted form of a [`BenchmarkRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
  pub name: String,
  pub value: f64,
  #[serde(default)]
  pub dataset: String,
  #[serde(default)]
  pub num_shots: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub task: Option<String>,
}

impl From<&BenchmarkRecord> for BenchmarkEntry {
  fn from(record: &BenchmarkRecord) -> Self {
    Self {
      name: record.name.clone(),
      value: record.value,
      dataset: record.dataset.clone(),
      num_shots: record.shots,
      task: record.canonical_task.clone(),
    }
  }
}

impl BenchmarkEntry {
  /// Rebuild a record. An empty dataset falls back to the name.
  pub fn to_record(&self) -> BenchmarkRecord {
    let mut record = BenchmarkRecord::new(&self.name, self.value).with_shots(self.num_shots);
    if !self.dataset.is_empty() {
      record.dataset = self.dataset.clone();
    }
    record.canonical_task = self.task.clone();
    record
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_split_model_id_two_segments() {
    assert_eq!(
      split_model_id("meta-llama/Llama-2-7b"),
      ("meta-llama".to_string(), "Llama-2-7b".to_string())
    );
  }

  #[test]
  fn test_split_model_id_other_shapes() {
    assert_eq!(split_model_id("gpt2"), ("unknown".to_string(), "gpt2".to_string()));
    assert_eq!(split_model_id("a/b/c"), ("unknown".to_string(), "a/b/c".to_string()));
  }

  #[test]
  fn test_record_defaults_dataset_to_normalized_name() {
    let record = BenchmarkRecord::new("  MMLU (5-shot) ", 70.1);
    assert_eq!(record.name, "mmlu (5-shot)");
    assert_eq!(record.dataset, "mmlu (5-shot)");
  }

  #[test]
  fn test_record_set_last_write_wins_keeps_position() {
    let mut set = RecordSet::new();
    set.insert(BenchmarkRecord::new("mmlu", 60.0).with_task("mmlu"));
    set.insert(BenchmarkRecord::new("gsm8k", 40.0).with_task("gsm8k"));
    let replaced = set.insert(BenchmarkRecord::new("mmlu", 65.0).with_task("mmlu"));

    assert_eq!(replaced.map(|r| r.value), Some(60.0));
    let values: Vec<_> = set.iter().map(|r| (r.name.as_str(), r.value)).collect();
    assert_eq!(values, vec![("mmlu", 65.0), ("gsm8k", 40.0)]);
  }

  #[test]
  fn test_record_set_distinct_datasets_coexist() {
    let set: RecordSet = vec![
      BenchmarkRecord::new("mmlu 5-shot", 70.0).with_task("mmlu"),
      BenchmarkRecord::new("mmlu 0-shot", 64.0).with_task("mmlu"),
    ]
    .into_iter()
    .collect();

    assert_eq!(set.len(), 2);
    assert!(set.get("mmlu", "mmlu 0-shot").is_some());
  }

  #[test]
  fn test_model_file_name() {
    assert_eq!(model_file_name("meta-llama/Llama-2-7b"), "meta-llama_Llama-2-7b.json");
  }

  #[test]
  fn test_export_roundtrip_preserves_benchmarks() {
    let data = ModelData::new(
      ModelMetadata::new("org/model"),
      vec![
        BenchmarkRecord::new("mmlu (5-shot)", 70.5)
          .with_task("mmlu")
          .with_shots(Some(5)),
        BenchmarkRecord::new("humaneval", 31.2).with_task("humaneval"),
      ],
      Some("text-generation".to_string()),
    );

    let json = serde_json::to_string_pretty(&data.to_export()).unwrap();
    let back: ModelExport = serde_json::from_str(&json).unwrap();

    let tuples = |entries: &[BenchmarkEntry]| {
      entries
        .iter()
        .map(|e| (e.name.clone(), e.value, e.dataset.clone(), e.num_shots))
        .collect::<Vec<_>>()
    };
    assert_eq!(tuples(&back.benchmarks), tuples(&data.to_export().benchmarks));
    assert_eq!(back.scraped_at, data.scraped_at);
  }

  #[test]
  fn test_export_field_contract() {
    let data = ModelData::new(
      ModelMetadata::new("org/model"),
      vec![BenchmarkRecord::new("mmlu", 70.0)],
      None,
    );
    let value = serde_json::to_value(data.to_export()).unwrap();

    for field in ["model_id", "author", "name", "downloads", "likes", "benchmarks", "scraped_at"] {
      assert!(value.get(field).is_some(), "missing {field}");
    }
    assert!(value.get("pipeline_tag").is_none());
    let entry = &value["benchmarks"][0];
    assert_eq!(entry["num_shots"], serde_json::Value::Null);
    assert_eq!(entry["dataset"], "mmlu");
  }

  #[test]
  fn test_entry_with_empty_dataset_falls_back_to_name() {
    let entry: BenchmarkEntry = serde_json::from_str(r#"{"name": "GSM8K", "value": 55.0}"#).unwrap();
    let record = entry.to_record();
    assert_eq!(record.dataset, "gsm8k");
    assert_eq!(record.canonical_task, None);
  }
}
