//! HTTP transport and scraping
//!
//! - [`client`]: `reqwest` transport behind the [`PageFetcher`] trait
//! - [`retry`]: exponential backoff with jitter and `Retry-After` support
//! - [`hub`]: model pages, model API, search and model cards
//! - [`leaderboard`]: task leaderboards, paper search and paper pages
//! - [`scrape`]: single-model and bounded-concurrency batch scraping

pub mod client;
mod error;
pub mod hub;
pub mod leaderboard;
pub mod retry;
pub mod scrape;
#[cfg(test)]
mod testing;

pub use client::{HttpClient, PageFetcher};
pub use error::{FetchError, Result};
pub use hub::{HubClient, HubModel, ModelSearch};
pub use leaderboard::LeaderboardClient;
pub use retry::RetryConfig;
pub use scrape::{model_data_from_html, scrape_batch, scrape_model};
