//! Canned pages standing in for the network in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::PageFetcher;
use crate::{FetchError, Result};

/// Serves pages from memory. Unknown URLs are 404s.
#[derive(Default)]
pub struct CannedPages {
  pages: HashMap<String, String>,
  statuses: HashMap<String, u16>,
  delays: HashMap<String, Duration>,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
}

impl CannedPages {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_page(mut self, url: &str, body: &str) -> Self {
    self.pages.insert(url.to_string(), body.to_string());
    self
  }

  pub fn with_status(mut self, url: &str, status: u16) -> Self {
    self.statuses.insert(url.to_string(), status);
    self
  }

  pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
    self.delays.insert(url.to_string(), delay);
    self
  }

  /// Most requests ever outstanding at once.
  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl PageFetcher for CannedPages {
  async fn get_text(&self, url: &str) -> Result<String> {
    let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(now, Ordering::SeqCst);

    if let Some(delay) = self.delays.get(url) {
      tokio::time::sleep(*delay).await;
    }
    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    if let Some(status) = self.statuses.get(url) {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: *status,
        retry_after: None,
      });
    }
    self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
      url: url.to_string(),
      status: 404,
      retry_after: None,
    })
  }
}
