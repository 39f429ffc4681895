//! Scraper for Kenyan elected-official profiles on mzalendo.com.
//!
//! Walks the National Assembly, Senate, and County Assembly listings,
//! enriches each leader from their profile page, and writes per-leader,
//! per-category, per-county, and corpus-wide JSON artifacts.

pub mod detail;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod model;
pub mod pipeline;
pub mod promises;
pub mod stats;
pub mod store;

pub use error::{FetchError, ScrapeError};
pub use fetch::{FetchConfig, Fetcher};
pub use model::{AggregateStats, Candidate, Category, Leader, ScrapeReport};
pub use pipeline::{ScrapeConfig, Scraper};
pub use store::Store;

/// Production site root.
pub const BASE_URL: &str = "https://mzalendo.com";
