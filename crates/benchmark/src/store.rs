//! On-disk storage of scraped model data.
//!
//! One pretty-printed JSON file per model under the data directory, named
//! after the model id with `/` replaced by `_`.

use std::path::{Path, PathBuf};

use claimcheck_core::{BenchmarkRecord, ModelData, ModelExport, model_file_name};
use extract::BenchmarkCatalog;
use serde::Serialize;
use tracing::{debug, info};

use crate::actual::resolve;
use crate::{BenchmarkError, Result};

#[derive(Debug, Clone)]
pub struct ScoreStore {
  data_dir: PathBuf,
}

impl ScoreStore {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self {
      data_dir: data_dir.into(),
    }
  }

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  /// Path a model's data is stored at.
  pub fn path_for(&self, model_id: &str) -> PathBuf {
    self.data_dir.join(model_file_name(model_id))
  }

  /// Save one model's data to its own file.
  pub fn save(&self, data: &ModelData) -> Result<PathBuf> {
    let path = self.path_for(&data.metadata.model_id);
    write_json(&path, &data.to_export())?;
    info!(model = %data.metadata.model_id, path = %path.display(), "Saved model data");
    Ok(path)
  }

  /// Load a model's stored export, or `None` if it was never scraped.
  pub fn load(&self, model_id: &str) -> Result<Option<ModelExport>> {
    let path = self.path_for(model_id);
    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(BenchmarkError::io(&path, e)),
    };
    let export = serde_json::from_str(&content).map_err(|e| BenchmarkError::json(&path, e))?;
    Ok(Some(export))
  }

  /// Reported benchmark records for a model, with tasks resolved through the catalog.
  ///
  /// A model that was never scraped has no reported records.
  pub fn load_reported(&self, model_id: &str, catalog: &BenchmarkCatalog) -> Result<Vec<BenchmarkRecord>> {
    let Some(export) = self.load(model_id)? else {
      debug!(model = model_id, "No stored data, nothing reported");
      return Ok(Vec::new());
    };

    Ok(
      export
        .benchmarks
        .iter()
        .map(|entry| resolve(entry.to_record(), catalog))
        .collect(),
    )
  }
}

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent).map_err(|e| BenchmarkError::io(parent, e))?;
  }
  let json = serde_json::to_string_pretty(value)?;
  std::fs::write(path, json).map_err(|e| BenchmarkError::io(path, e))
}
