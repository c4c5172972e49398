pub mod config;
pub mod model;

pub use config::{
  CatalogConfig, CatalogEntryConfig, ComparisonConfig, Config, ConfigError, LoggingConfig, PROJECT_CONFIG_FILE,
  RetrySettings, ScraperConfig, StorageConfig,
};
pub use model::{
  BenchmarkEntry, BenchmarkRecord, ModelData, ModelExport, ModelMetadata, RecordKey, RecordSet, model_file_name,
  normalize_label, split_model_id,
};
