//! Measured benchmark scores.
//!
//! Models are never run here. Measured scores are read from JSON files that
//! an evaluation harness produced, in any of these shapes:
//!
//! - a single model export (`{"model_id": ..., "benchmarks": [...]}`)
//! - an array of model exports
//! - a flat map: `{"org/model": {"mmlu": 63.1, "humaneval": 12.0}}`

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use claimcheck_core::{BenchmarkRecord, ModelExport};
use extract::BenchmarkCatalog;
use serde::Deserialize;
use tracing::debug;

use crate::comparison::ActualSource;
use crate::{BenchmarkError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum MeasuredFile {
  Single(ModelExport),
  Many(Vec<ModelExport>),
  Flat(BTreeMap<String, BTreeMap<String, f64>>),
}

/// Measured records keyed by `(model_id, task)`.
#[derive(Debug, Clone, Default)]
pub struct MeasuredScores {
  scores: HashMap<(String, String), BenchmarkRecord>,
}

impl MeasuredScores {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load a measurement file, resolving benchmark names through the catalog.
  pub fn load(path: &Path, catalog: &BenchmarkCatalog) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|e| BenchmarkError::io(path, e))?;
    Self::from_json(&content, catalog).map_err(|e| BenchmarkError::json(path, e))
  }

  pub fn from_json(content: &str, catalog: &BenchmarkCatalog) -> std::result::Result<Self, serde_json::Error> {
    let file: MeasuredFile = serde_json::from_str(content)?;
    let mut scores = Self::new();

    match file {
      MeasuredFile::Single(export) => scores.add_export(&export, catalog),
      MeasuredFile::Many(exports) => exports.iter().for_each(|export| scores.add_export(export, catalog)),
      MeasuredFile::Flat(models) => {
        for (model_id, tasks) in models {
          for (task, value) in tasks {
            let record = resolve(BenchmarkRecord::new(&task, value), catalog);
            scores.insert(&model_id, record);
          }
        }
      }
    }

    debug!(count = scores.len(), "Loaded measured scores");
    Ok(scores)
  }

  fn add_export(&mut self, export: &ModelExport, catalog: &BenchmarkCatalog) {
    for entry in &export.benchmarks {
      self.insert(&export.model_id, resolve(entry.to_record(), catalog));
    }
  }

  /// Add a measured record. A later record for the same task replaces an earlier one.
  pub fn insert(&mut self, model_id: &str, record: BenchmarkRecord) {
    let key = (model_id.to_string(), record.task().to_string());
    self.scores.insert(key, record);
  }

  pub fn len(&self) -> usize {
    self.scores.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scores.is_empty()
  }
}

impl ActualSource for MeasuredScores {
  fn actual(&self, model_id: &str, task: &str) -> Option<BenchmarkRecord> {
    self.scores.get(&(model_id.to_string(), task.to_string())).cloned()
  }
}

/// Fill in the canonical task from the catalog when the record has none.
pub(crate) fn resolve(record: BenchmarkRecord, catalog: &BenchmarkCatalog) -> BenchmarkRecord {
  if record.canonical_task.is_some() {
    return record;
  }
  match catalog.match_task(&record.name) {
    Some(task) => {
      let task = task.to_string();
      record.with_task(task)
    }
    None => record,
  }
}
