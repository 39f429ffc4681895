//! Error types for the scraper library.

use reqwest::StatusCode;

/// Failure of a single HTTP retrieval.
///
/// `Exhausted` is the only variant callers of [`crate::Fetcher::fetch`] see
/// for a flaky URL; intermediate attempt failures stay inside the retry loop.
/// Callers treat it as "no data" for that URL, never as fatal to the run.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}")]
    HttpStatus { status: StatusCode },
    #[error("gave up fetching {0} after all retries")]
    Exhausted(String),
}

/// Errors that escalate past a category scrape.
///
/// Extraction problems never appear here: a malformed card or field is logged
/// and omitted at the smallest possible scope. Persistence failures do
/// propagate, since a silently dropped write would lose a record.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
