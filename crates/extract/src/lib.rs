//! Benchmark extraction and normalization
//!
//! Turns loosely structured pages into typed benchmark records:
//! - [`numeric`]: counts ("1.2M") and scores ("75.3%")
//! - [`shots`]: few-shot counts embedded in labels
//! - [`catalog`]: ordered benchmark name matching
//! - [`page`]: model page tables, evaluation sections, pipeline tag, metadata
//! - [`leaderboard`]: research leaderboard, search and paper pages
//! - [`model_card`]: README front matter

pub mod catalog;
pub mod leaderboard;
pub mod model_card;
pub mod numeric;
pub mod page;
pub mod shots;

pub use catalog::{BenchmarkCatalog, CatalogEntry, DEFAULT_METRIC};
pub use leaderboard::{
  LeaderboardEntry, PaperBenchmark, PaperDetails, PaperSearchResult, parse_leaderboard, parse_paper_details,
  parse_search_results,
};
pub use model_card::{ModelCard, parse_model_card};
pub use numeric::{parse_count, parse_score};
pub use page::{PageBenchmarkExtractor, extract_metadata, extract_pipeline_tag};
pub use shots::extract_num_shots;
