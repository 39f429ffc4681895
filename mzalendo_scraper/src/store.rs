//! On-disk JSON artifacts for scraped leaders.
//!
//! Every write is a full-file overwrite of pretty-printed UTF-8 JSON;
//! serde_json leaves non-ASCII characters unescaped, so names survive
//! verbatim. Reruns are idempotent at the file level and never merge with
//! prior content.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ScrapeError;
use crate::model::{AggregateStats, Category, CountySummary, Leader};

static UNSAFE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]").expect("invalid id sanitizer regex"));

/// Writes per-leader, per-category, per-county, and corpus-wide artifacts
/// under one output directory. Constructed once per run and shared by
/// reference; concurrent writers always target disjoint paths.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Creates the output directory and the three category subdirectories.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let root = root.into();
        for category in [
            Category::NationalAssembly,
            Category::Senate,
            Category::CountyAssemblies,
        ] {
            fs::create_dir_all(root.join(category.slug()))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ScrapeError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Persists one leader under its category directory, keyed by a
    /// filesystem-safe form of its id.
    ///
    /// Distinct profiles whose ids sanitize to the same string overwrite each
    /// other here; known limitation, the site's ids are assumed unique per
    /// category.
    pub fn write_leader(&self, leader: &Leader) -> Result<(), ScrapeError> {
        let path = self
            .root
            .join(leader.category.slug())
            .join(format!("{}.json", safe_id(leader)));
        Self::write_json(&path, leader)
    }

    /// Writes the full record list of one category to `{category}_summary.json`.
    pub fn write_summary(&self, category: Category, leaders: &[Leader]) -> Result<(), ScrapeError> {
        let path = self.root.join(format!("{}_summary.json", category.slug()));
        Self::write_json(&path, leaders)
    }

    /// Writes the combined corpus to `all_leaders.json`.
    pub fn write_all(&self, leaders: &[Leader]) -> Result<(), ScrapeError> {
        Self::write_json(&self.root.join("all_leaders.json"), leaders)
    }

    /// Groups leaders by county into `counties/<slug>.json` files plus a
    /// `counties_summary.json` of per-county counts. Leaders without a county
    /// appear in neither.
    pub fn write_counties(&self, leaders: &[Leader]) -> Result<(), ScrapeError> {
        let mut counties: BTreeMap<&str, Vec<&Leader>> = BTreeMap::new();
        for leader in leaders {
            if let Some(county) = leader.county.as_deref().filter(|name| !name.is_empty()) {
                counties.entry(county).or_default().push(leader);
            }
        }

        let county_dir = self.root.join("counties");
        fs::create_dir_all(&county_dir)?;

        let mut summary = Vec::with_capacity(counties.len());
        for (county, members) in &counties {
            let lowered = county.to_lowercase().replace(' ', "_");
            let slug = UNSAFE_ID.replace_all(&lowered, "");
            Self::write_json(&county_dir.join(format!("{slug}.json")), members)?;
            summary.push(CountySummary {
                name: county.to_string(),
                leaders_count: members.len(),
            });
        }
        Self::write_json(&self.root.join("counties_summary.json"), &summary)
    }

    /// Writes the aggregate statistics to `statistics.json`.
    pub fn write_stats(&self, stats: &AggregateStats) -> Result<(), ScrapeError> {
        Self::write_json(&self.root.join("statistics.json"), stats)
    }
}

/// Filesystem-safe persistence key: the leader's id with everything outside
/// `[\w-]` stripped, falling back to a name slug for an empty id.
fn safe_id(leader: &Leader) -> String {
    let id = if leader.id.is_empty() {
        leader.name.to_lowercase().replace(' ', "-")
    } else {
        leader.id.clone()
    };
    UNSAFE_ID.replace_all(&id, "").into_owned()
}
