use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("{url} returned HTTP {status}")]
  Status {
    url: String,
    status: u16,
    /// Server-requested delay from a `Retry-After` header
    retry_after: Option<Duration>,
  },
  #[error("Network error: {0}")]
  Network(String),
  #[error("Request timed out")]
  Timeout,
  #[error("Invalid URL {0}")]
  InvalidUrl(String),
  #[error("Unexpected response from {url}: {message}")]
  Decode { url: String, message: String },
  #[error("HTML parse error: {0}")]
  Parse(#[from] parser::ParseError),
}

impl FetchError {
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Request(e) => e.status().map(|s| s.as_u16()),
      _ => None,
    }
  }

  pub fn is_not_found(&self) -> bool {
    self.status() == Some(404)
  }
}

pub type Result<T> = std::result::Result<T, FetchError>;
