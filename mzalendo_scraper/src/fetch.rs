//! Resilient page fetching with retry, backoff, and rate limiting.

use std::time::Duration;

use crate::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Retry and throttle knobs for [`Fetcher`].
///
/// Both units are scaled per attempt: failure `n` (zero-based) waits
/// `backoff_unit * (n + 1)` before the next try, and a fetch that succeeds on
/// attempt `n` sleeps `throttle_unit * (n + 2)` before returning, so the
/// request rate drops once a page has proven flaky. Tests shrink the units to
/// keep runs fast; the defaults are 2s backoff and 1s + 0.5s-per-retry
/// throttle.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_retries: u32,
    pub backoff_unit: Duration,
    pub throttle_unit: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit: Duration::from_secs(2),
            throttle_unit: Duration::from_millis(500),
        }
    }
}

/// HTTP retrieval with browser-like headers and a 30-second per-attempt
/// timeout. Constructed once per run and shared by reference across the
/// pipeline; the only suspension points in the whole scrape live here.
pub struct Fetcher {
    http: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetches `url`, retrying up to `max_retries` attempts.
    ///
    /// Exhausting every attempt yields [`FetchError::Exhausted`]; callers
    /// treat that as "no data" for the URL, never as fatal to the run.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        for attempt in 0..self.config.max_retries {
            match self.try_fetch(url).await {
                Ok(body) => {
                    // Be nice to the server, increasingly so after failures.
                    tokio::time::sleep(self.config.throttle_unit * (attempt + 2)).await;
                    return Ok(body);
                }
                Err(err) => {
                    tracing::warn!(
                        "attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        self.config.max_retries,
                        url,
                        err
                    );
                    if attempt + 1 == self.config.max_retries {
                        tracing::error!(
                            "failed to fetch {} after {} attempts",
                            url,
                            self.config.max_retries
                        );
                        break;
                    }
                    tokio::time::sleep(self.config.backoff_unit * (attempt + 1)).await;
                }
            }
        }
        Err(FetchError::Exhausted(url.to_string()))
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(url)
            .header("accept-language", "en-US,en;q=0.9")
            .header("referer", "https://mzalendo.com/")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::HttpStatus {
                status: resp.status(),
            });
        }

        Ok(resp.text().await?)
    }
}
