//! Category-level scrape orchestration.
//!
//! Pagination traversal and category sequencing stay strictly sequential;
//! only detail-page enrichment fans out, over a bounded worker pool. Each
//! worker owns one candidate end to end (fetch, parse, persist) and failures
//! are logged and dropped without touching sibling work.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

use crate::detail;
use crate::enrich;
use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::listing;
use crate::model::{Candidate, Category, Leader, ScrapeReport};
use crate::stats;
use crate::store::Store;
use crate::BASE_URL;

/// Knobs for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Width of the detail-stage worker pool.
    pub max_workers: usize,

    /// When false, detail pages are processed one at a time. Slower, but the
    /// interleaving-free logs make debugging extraction issues much easier.
    /// Both modes produce the same record set, modulo ordering.
    pub concurrent: bool,

    /// Restrict county-assembly scraping to these county names,
    /// case-insensitively. Empty means every discovered county.
    pub counties: Vec<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            concurrent: true,
            counties: Vec::new(),
        }
    }
}

/// Drives the scrape: listing traversal, detail enrichment, persistence.
pub struct Scraper {
    fetcher: Arc<Fetcher>,
    store: Arc<Store>,
    base_url: Url,
    config: ScrapeConfig,
}

impl Scraper {
    pub fn new(fetcher: Fetcher, store: Store, config: ScrapeConfig) -> Result<Self, ScrapeError> {
        Self::with_base_url(fetcher, store, config, BASE_URL)
    }

    /// Points the scraper at a different site root. Used for testing against
    /// a local mock server.
    pub fn with_base_url(
        fetcher: Fetcher,
        store: Store,
        config: ScrapeConfig,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher: Arc::new(fetcher),
            store: Arc::new(store),
            base_url: Url::parse(base_url)?,
            config,
        })
    }

    /// Canonical listing seed URL for a category.
    pub fn seed_url(&self, category: Category) -> Result<Url, ScrapeError> {
        Ok(self.base_url.join(category.seed_path())?)
    }

    /// Scrapes one category listing end to end: the seed page, its numbered
    /// pagination, then the detail page of every candidate found. Every
    /// leader is persisted as soon as its detail page parses.
    ///
    /// A seed page that cannot be fetched yields an empty result, the only
    /// abort-like condition a category has; any later failure only costs the
    /// single page or candidate involved.
    pub async fn scrape_category(
        &self,
        seed: &Url,
        category: Category,
        subcategory: Option<&str>,
    ) -> Result<Vec<Leader>, ScrapeError> {
        match subcategory {
            Some(sub) => tracing::info!("scraping {} - {} from {}", category, sub, seed),
            None => tracing::info!("scraping {} from {}", category, seed),
        }

        let Ok(html) = self.fetcher.fetch(seed.as_str()).await else {
            return Ok(Vec::new());
        };

        let mut candidates = listing::parse_listing(&html, category, &self.base_url);

        for page_url in listing::find_pagination_links(&html, seed) {
            // The seed page is already parsed; only fetch the others.
            if page_url == *seed {
                continue;
            }
            tracing::info!("processing page {}", page_url);
            match self.fetcher.fetch(page_url.as_str()).await {
                Ok(page_html) => {
                    candidates.extend(listing::parse_listing(&page_html, category, &self.base_url))
                }
                Err(err) => tracing::warn!("skipping listing page {}: {}", page_url, err),
            }
        }

        tracing::info!("found {} candidates in {}", candidates.len(), category);

        let leaders = if self.config.concurrent {
            self.process_concurrent(candidates, subcategory).await?
        } else {
            self.process_sequential(candidates, subcategory).await
        };

        tracing::info!(
            "scraped details for {} leaders in {}",
            leaders.len(),
            category
        );
        Ok(leaders)
    }

    async fn process_sequential(
        &self,
        candidates: Vec<Candidate>,
        subcategory: Option<&str>,
    ) -> Vec<Leader> {
        let mut leaders = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let name = candidate.name.clone();
            match process_candidate(&self.fetcher, &self.store, candidate, subcategory).await {
                Ok(leader) => leaders.push(leader),
                Err(err) => tracing::error!("error processing {}: {}", name, err),
            }
        }
        leaders
    }

    /// Fans candidates out over `max_workers` concurrent tasks. Results come
    /// back over a channel in completion order; candidate-list order is not
    /// preserved and nothing downstream depends on it.
    async fn process_concurrent(
        &self,
        candidates: Vec<Candidate>,
        subcategory: Option<&str>,
    ) -> Result<Vec<Leader>, ScrapeError> {
        let width = self.config.max_workers.max(1);
        let semaphore = Arc::new(Semaphore::new(width));
        let (tx, mut rx) = mpsc::channel::<Leader>(width * 2);
        let mut join_set = JoinSet::new();

        for candidate in candidates {
            let sem = Arc::clone(&semaphore);
            let sender = tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let store = Arc::clone(&self.store);
            let subcategory = subcategory.map(str::to_string);

            join_set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return;
                };
                let name = candidate.name.clone();
                match process_candidate(&fetcher, &store, candidate, subcategory.as_deref()).await {
                    Ok(leader) => {
                        let _ = sender.send(leader).await;
                    }
                    Err(err) => tracing::error!("error processing {}: {}", name, err),
                }
            });
        }
        drop(tx);

        let mut leaders = Vec::new();
        while let Some(leader) = rx.recv().await {
            leaders.push(leader);
        }
        while let Some(result) = join_set.join_next().await {
            result?;
        }
        Ok(leaders)
    }

    /// Discovers the per-county sub-listings on the county-assemblies index
    /// and scrapes each as a subcategory, honoring the county filter.
    pub async fn scrape_county_assemblies(&self) -> Result<Vec<Leader>, ScrapeError> {
        let seed = self.seed_url(Category::CountyAssemblies)?;
        let Ok(html) = self.fetcher.fetch(seed.as_str()).await else {
            return Ok(Vec::new());
        };

        let wanted: Vec<String> = self
            .config
            .counties
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();

        let mut leaders = Vec::new();
        for (county_name, county_url) in listing::find_county_links(&html, &self.base_url) {
            if !wanted.is_empty() && !wanted.contains(&county_name.to_lowercase()) {
                continue;
            }
            let county = self
                .scrape_category(&county_url, Category::CountyAssemblies, Some(&county_name))
                .await?;
            leaders.extend(county);
        }
        Ok(leaders)
    }

    /// Runs the complete pipeline: every category, county discovery, the
    /// enrichment pass, and all summary artifacts.
    pub async fn scrape_all(&self) -> Result<ScrapeReport, ScrapeError> {
        let started = Instant::now();
        tracing::info!("starting complete scrape of {}", self.base_url);

        let na_seed = self.seed_url(Category::NationalAssembly)?;
        let mut national_assembly = self
            .scrape_category(&na_seed, Category::NationalAssembly, None)
            .await?;

        let senate_seed = self.seed_url(Category::Senate)?;
        let mut senate = self
            .scrape_category(&senate_seed, Category::Senate, None)
            .await?;

        let mut county_assemblies = self.scrape_county_assemblies().await?;

        enrich::enrich(&mut national_assembly);
        enrich::enrich(&mut senate);
        enrich::enrich(&mut county_assemblies);

        self.store
            .write_summary(Category::NationalAssembly, &national_assembly)?;
        self.store.write_summary(Category::Senate, &senate)?;
        self.store
            .write_summary(Category::CountyAssemblies, &county_assemblies)?;

        let mut report = ScrapeReport {
            national_assembly: national_assembly.len(),
            senate: senate.len(),
            county_assemblies: county_assemblies.len(),
            ..ScrapeReport::default()
        };

        let mut all_leaders = national_assembly;
        all_leaders.append(&mut senate);
        all_leaders.append(&mut county_assemblies);
        report.total = all_leaders.len();

        self.store.write_all(&all_leaders)?;
        self.store.write_counties(&all_leaders)?;
        self.store.write_stats(&stats::compute_stats(&all_leaders))?;

        report.duration_seconds = started.elapsed().as_secs();
        tracing::info!(
            "scrape complete in {}s, data saved to {}",
            report.duration_seconds,
            self.store.root().display()
        );
        Ok(report)
    }
}

/// One candidate's full detail trip: fetch, parse, tag, persist.
async fn process_candidate(
    fetcher: &Fetcher,
    store: &Store,
    candidate: Candidate,
    subcategory: Option<&str>,
) -> Result<Leader, ScrapeError> {
    tracing::info!("getting details for {}", candidate.name);
    let html = fetcher.fetch(&candidate.profile_url).await?;
    let mut leader = detail::parse_detail(&html, &candidate);
    if let Some(sub) = subcategory {
        leader.subcategory = Some(sub.to_string());
    }
    store.write_leader(&leader)?;
    Ok(leader)
}
