// Retries with exponential backoff
//
// - Exponential backoff with up to 25% jitter
// - Retry on network errors, timeouts and HTTP 429, 502, 503, 504
// - A Retry-After header replaces the computed backoff (capped at max_backoff)

use std::future::Future;
use std::time::Duration;

use claimcheck_core::RetrySettings;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::{FetchError, Result};

/// Status codes worth retrying
const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// Configuration for retried HTTP operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
  /// Maximum number of retry attempts
  pub max_retries: u32,
  /// Initial backoff duration
  pub initial_backoff: Duration,
  /// Maximum backoff duration
  pub max_backoff: Duration,
  /// Backoff multiplier (exponential factor)
  pub backoff_multiplier: f64,
  /// Whether to add jitter to backoff
  pub add_jitter: bool,
  /// Timeout for a single attempt
  pub request_timeout: Duration,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self::from_settings(&RetrySettings::default(), Duration::from_secs(30))
  }
}

impl RetryConfig {
  pub fn from_settings(settings: &RetrySettings, request_timeout: Duration) -> Self {
    Self {
      max_retries: settings.max_retries,
      initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
      max_backoff: Duration::from_millis(settings.max_backoff_ms),
      backoff_multiplier: sanitize_multiplier(settings.backoff_multiplier),
      add_jitter: settings.jitter,
      request_timeout,
    }
  }

  /// Calculate backoff duration for a given attempt
  pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
    let base = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
    // NaN.max(0.0) is 0.0, so the result is always a valid duration
    let mut backoff = Duration::from_secs_f64(base.max(0.0).min(self.max_backoff.as_secs_f64()));

    if self.add_jitter {
      let jitter_factor = 1.0 + (rand_f64() * 0.25);
      backoff = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);
    }

    backoff.min(self.max_backoff)
  }

  /// Delay before the retry following `error`.
  pub fn delay_for(&self, attempt: u32, error: &FetchError) -> Duration {
    match error {
      FetchError::Status {
        retry_after: Some(wait), ..
      } => (*wait).min(self.max_backoff),
      _ => self.backoff_for_attempt(attempt),
    }
  }
}

/// Backoff never shrinks between attempts; anything below 1.0 or non-finite becomes 1.0.
fn sanitize_multiplier(multiplier: f64) -> f64 {
  if multiplier.is_finite() && multiplier >= 1.0 {
    multiplier
  } else {
    warn!(multiplier, "Invalid retry backoff_multiplier, using 1.0");
    1.0
  }
}

/// Pseudo-random number in [0, 1) for jitter
fn rand_f64() -> f64 {
  use std::time::{SystemTime, UNIX_EPOCH};

  let nanos = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .subsec_nanos();

  (nanos as f64 / u32::MAX as f64).fract()
}

pub fn is_retryable_status(status: u16) -> bool {
  RETRYABLE_STATUSES.contains(&status)
}

/// Check if an error is retryable
pub fn is_retryable(error: &FetchError) -> bool {
  match error {
    FetchError::Network(_) | FetchError::Timeout => true,
    FetchError::Status { status, .. } => is_retryable_status(*status),
    FetchError::Request(e) => {
      e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| is_retryable_status(s.as_u16()))
    }
    _ => false,
  }
}

/// Parse a `Retry-After` header given in seconds.
///
/// HTTP-date values are ignored and fall back to the computed backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
  value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Run `op` until it succeeds, fails with a non-retryable error, or retries run out.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, what: &str, mut op: F) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T>>,
{
  let max_retries = config.max_retries;
  let mut last_error = None;

  for attempt in 0..=max_retries {
    if attempt > 0
      && let Some(previous) = &last_error
    {
      let backoff = config.delay_for(attempt - 1, previous);
      trace!(backoff_ms = backoff.as_millis(), "Applying backoff before retry");
      debug!(what, attempt, max_retries, backoff_ms = backoff.as_millis(), "Retrying after backoff");
      sleep(backoff).await;
    }

    match tokio::time::timeout(config.request_timeout, op()).await {
      Ok(Ok(value)) => {
        if attempt > 0 {
          info!(what, attempt, "Request succeeded after retry");
        }
        return Ok(value);
      }
      Ok(Err(e)) => {
        if !is_retryable(&e) {
          return Err(e);
        }
        if attempt < max_retries {
          warn!(what, attempt = attempt + 1, max_retries, err = %e, "Retryable error, will retry");
        }
        last_error = Some(e);
      }
      Err(_) => {
        warn!(
          what,
          attempt = attempt + 1,
          max_retries,
          timeout_ms = config.request_timeout.as_millis(),
          "Request timed out"
        );
        last_error = Some(FetchError::Timeout);
      }
    }
  }

  warn!(what, max_retries, "All retries exhausted");
  Err(last_error.unwrap_or(FetchError::Timeout))
}
