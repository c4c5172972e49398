//! HTTP transport.
//!
//! [`PageFetcher`] is the seam between the site clients and the network:
//! [`HttpClient`] implements it over `reqwest` with retries, tests implement
//! it over canned pages.

use std::time::Duration;

use async_trait::async_trait;
use claimcheck_core::{RetrySettings, ScraperConfig};
use reqwest::header::RETRY_AFTER;
use tracing::{debug, trace, warn};

use crate::retry::{RetryConfig, parse_retry_after, with_retry};
use crate::{FetchError, Result};

const MAX_REDIRECTS: usize = 10;

/// Source of page bodies by URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
  /// GET `url` and return the response body. Non-2xx responses are
  /// [`FetchError::Status`] errors.
  async fn get_text(&self, url: &str) -> Result<String>;
}

/// `Ok(None)` for a 404, everything else unchanged.
pub fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
  match result {
    Ok(value) => Ok(Some(value)),
    Err(e) if e.is_not_found() => Ok(None),
    Err(e) => Err(e),
  }
}

/// Build a URL with an encoded query string.
pub fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<String> {
  reqwest::Url::parse_with_params(base, params)
    .map(String::from)
    .map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))
}

/// Trim trailing slashes so paths can be appended with `format!`.
pub(crate) fn base_url(url: &str) -> String {
  url.trim_end_matches('/').to_string()
}

/// `reqwest` client with a user agent, timeout, redirects and retries.
#[derive(Clone)]
pub struct HttpClient {
  client: reqwest::Client,
  retry: RetryConfig,
}

impl HttpClient {
  pub fn new(scraper: &ScraperConfig, retry: &RetrySettings) -> Result<Self> {
    let timeout = Duration::from_secs(scraper.timeout_secs);
    let client = reqwest::Client::builder()
      .user_agent(scraper.user_agent.as_str())
      .timeout(timeout)
      .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
      .build()?;

    Ok(Self {
      client,
      retry: RetryConfig::from_settings(retry, timeout),
    })
  }

  pub fn retry_config(&self) -> &RetryConfig {
    &self.retry
  }

  async fn get_once(&self, url: &str) -> Result<String> {
    trace!(url, "GET");
    let response = self.client.get(url).send().await.map_err(classify)?;
    let status = response.status();

    if !status.is_success() {
      let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after);
      let body = response.text().await.unwrap_or_default();
      if status.as_u16() == 404 {
        debug!(url, "Not found");
      } else {
        warn!(status = %status, url, body_len = body.len(), "Request failed");
      }
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        retry_after,
      });
    }

    let body = response.text().await.map_err(classify)?;
    debug!(url, bytes = body.len(), "Fetched");
    Ok(body)
  }
}

#[async_trait]
impl PageFetcher for HttpClient {
  async fn get_text(&self, url: &str) -> Result<String> {
    with_retry(&self.retry, url, || self.get_once(url)).await
  }
}

fn classify(e: reqwest::Error) -> FetchError {
  if e.is_timeout() {
    FetchError::Timeout
  } else if e.is_connect() {
    FetchError::Network(e.to_string())
  } else {
    FetchError::Request(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_url_with_params_encodes() {
    let url = url_with_params(
      "https://hub.test/api/models",
      &[("search", "llama 2"), ("sort", "downloads"), ("limit", "5")],
    )
    .unwrap();
    assert_eq!(url, "https://hub.test/api/models?search=llama+2&sort=downloads&limit=5");
  }

  #[test]
  fn test_url_with_params_rejects_garbage() {
    assert!(matches!(
      url_with_params("not a url", &[]),
      Err(FetchError::InvalidUrl(_))
    ));
  }

  #[test]
  fn test_base_url_trims_slashes() {
    assert_eq!(base_url("https://hub.test//"), "https://hub.test");
    assert_eq!(base_url("https://hub.test"), "https://hub.test");
  }

  #[test]
  fn test_not_found_as_none() {
    let missing: Result<u8> = Err(FetchError::Status {
      url: String::new(),
      status: 404,
      retry_after: None,
    });
    assert!(not_found_as_none(missing).unwrap().is_none());
    assert_eq!(not_found_as_none(Ok(3)).unwrap(), Some(3));
    assert!(not_found_as_none::<u8>(Err(FetchError::Timeout)).is_err());
  }

  #[test]
  fn test_client_builds_from_defaults() {
    let client = HttpClient::new(&ScraperConfig::default(), &RetrySettings::default()).unwrap();
    assert_eq!(client.retry_config().max_retries, 3);
    assert_eq!(client.retry_config().request_timeout, Duration::from_secs(30));
  }
}
