//! Model hub client: model pages, the JSON API and model cards.

use std::sync::Arc;

use claimcheck_core::{ModelMetadata, ScraperConfig};
use extract::{BenchmarkCatalog, ModelCard, PageBenchmarkExtractor, parse_model_card};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{PageFetcher, base_url, not_found_as_none, url_with_params};
use crate::{FetchError, Result};

const LICENSE_TAG_PREFIX: &str = "license:";

/// A model as listed by the hub API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubModel {
  #[serde(default)]
  pub id: String,
  #[serde(default, rename = "modelId", skip_serializing_if = "Option::is_none")]
  pub model_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sha: Option<String>,
  #[serde(default, rename = "lastModified", skip_serializing_if = "Option::is_none")]
  pub last_modified: Option<String>,
  #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(default)]
  pub private: bool,
  #[serde(default)]
  pub downloads: u64,
  #[serde(default)]
  pub likes: u64,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pipeline_tag: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub library_name: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub siblings: Vec<Sibling>,
}

/// A file in a model repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sibling {
  pub rfilename: String,
}

impl HubModel {
  /// The model id, whichever of `id`/`modelId` the API filled in.
  pub fn model_id(&self) -> &str {
    match &self.model_id {
      Some(id) if self.id.is_empty() => id,
      _ => &self.id,
    }
  }

  /// License from a `license:<name>` tag.
  pub fn license(&self) -> Option<&str> {
    self.tags.iter().find_map(|t| t.strip_prefix(LICENSE_TAG_PREFIX))
  }

  pub fn to_metadata(&self) -> ModelMetadata {
    let mut metadata = ModelMetadata::new(self.model_id());
    metadata.downloads = self.downloads;
    metadata.likes = self.likes;
    metadata.tags = self.tags.clone();
    metadata.last_modified = self.last_modified.clone();
    metadata.license = self.license().map(str::to_string);
    metadata
  }
}

/// Query for the model listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSearch {
  pub query: Option<String>,
  pub pipeline_tag: Option<String>,
  pub sort: String,
  /// -1 for descending
  pub direction: i8,
  pub limit: usize,
}

impl Default for ModelSearch {
  fn default() -> Self {
    Self {
      query: None,
      pipeline_tag: None,
      sort: "downloads".to_string(),
      direction: -1,
      limit: 20,
    }
  }
}

impl ModelSearch {
  /// Most downloaded models.
  pub fn popular(limit: usize) -> Self {
    Self {
      limit,
      ..Self::default()
    }
  }

  pub fn text(query: impl Into<String>, limit: usize) -> Self {
    Self {
      query: Some(query.into()),
      limit,
      ..Self::default()
    }
  }

  pub fn with_pipeline_tag(mut self, tag: impl Into<String>) -> Self {
    self.pipeline_tag = Some(tag.into());
    self
  }
}

/// Client for a model hub.
#[derive(Clone)]
pub struct HubClient {
  fetcher: Arc<dyn PageFetcher>,
  hub_url: String,
  api_url: String,
  extractor: PageBenchmarkExtractor,
}

impl HubClient {
  pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ScraperConfig, catalog: BenchmarkCatalog) -> Self {
    Self {
      fetcher,
      hub_url: base_url(&config.hub_url),
      api_url: base_url(&config.api_url),
      extractor: PageBenchmarkExtractor::new(catalog),
    }
  }

  pub fn extractor(&self) -> &PageBenchmarkExtractor {
    &self.extractor
  }

  pub fn model_page_url(&self, model_id: &str) -> String {
    format!("{}/{}", self.hub_url, model_id)
  }

  pub fn model_api_url(&self, model_id: &str) -> String {
    format!("{}/models/{}", self.api_url, model_id)
  }

  pub fn model_card_url(&self, model_id: &str) -> String {
    format!("{}/{}/raw/main/README.md", self.hub_url, model_id)
  }

  pub fn search_url(&self, search: &ModelSearch) -> Result<String> {
    let limit = search.limit.to_string();
    let direction = search.direction.to_string();
    let mut params = vec![("sort", search.sort.as_str()), ("direction", direction.as_str()), ("limit", limit.as_str())];
    if let Some(query) = &search.query {
      params.insert(0, ("search", query.as_str()));
    }
    if let Some(tag) = &search.pipeline_tag {
      params.push(("pipeline_tag", tag.as_str()));
    }
    url_with_params(&format!("{}/models", self.api_url), &params)
  }

  /// Raw HTML of a model page.
  pub async fn model_page(&self, model_id: &str) -> Result<String> {
    self.fetcher.get_text(&self.model_page_url(model_id)).await
  }

  /// Model details from the JSON API.
  pub async fn model_info(&self, model_id: &str) -> Result<HubModel> {
    let url = self.model_api_url(model_id);
    let body = self.fetcher.get_text(&url).await?;
    decode(&url, &body)
  }

  pub async fn search_models(&self, search: &ModelSearch) -> Result<Vec<HubModel>> {
    let url = self.search_url(search)?;
    let body = self.fetcher.get_text(&url).await?;
    let models: Vec<HubModel> = decode(&url, &body)?;
    info!(count = models.len(), query = ?search.query, "Listed models");
    Ok(models)
  }

  pub async fn popular_models(&self, limit: usize) -> Result<Vec<HubModel>> {
    self.search_models(&ModelSearch::popular(limit)).await
  }

  /// Parsed README. A model without one gets an empty card.
  pub async fn model_card(&self, model_id: &str) -> Result<ModelCard> {
    let result = self.fetcher.get_text(&self.model_card_url(model_id)).await;
    match not_found_as_none(result)? {
      Some(content) => Ok(parse_model_card(model_id, &content)),
      None => {
        debug!(model = model_id, "No model card");
        Ok(ModelCard::empty(model_id))
      }
    }
  }
}

fn decode<T: serde::de::DeserializeOwned>(url: &str, body: &str) -> Result<T> {
  serde_json::from_str(body).map_err(|e| FetchError::Decode {
    url: url.to_string(),
    message: e.to_string(),
  })
}
