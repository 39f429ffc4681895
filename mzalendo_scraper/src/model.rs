//! Record schema for scraped leaders and the aggregate artifacts.
//!
//! JSON field names match the site's historical export format, which mixes
//! snake_case candidate fields (`profile_url`) with camelCase detail fields
//! (`approvalRating`). Optional detail sections are omitted entirely when
//! absent; count maps are `BTreeMap` so reruns serialize byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level legislative body a leader belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "national_assembly")]
    NationalAssembly,

    #[serde(rename = "senate")]
    Senate,

    #[serde(rename = "county_assemblies")]
    CountyAssemblies,
}

impl Category {
    /// Directory name and summary-file prefix for this category.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::NationalAssembly => "national_assembly",
            Category::Senate => "senate",
            Category::CountyAssemblies => "county_assemblies",
        }
    }

    /// Listing seed path on the site.
    pub fn seed_path(&self) -> &'static str {
        match self {
            Category::NationalAssembly => "/parliament/national_assembly/",
            Category::Senate => "/parliament/senate/",
            Category::CountyAssemblies => "/parliament/county_assemblies/",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Summary-level entity extracted from a listing page, before detail
/// enrichment. Exists only transiently in memory.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Candidate {
    pub name: String,

    /// Raw position text from the card, `"Unknown"` when the card has none.
    pub position: String,

    /// Parsed from position text matching "Member for X Constituency".
    pub constituency: Option<String>,

    /// Usually absent at this stage; filled by the detail page or enricher.
    pub county: Option<String>,

    /// Absolute profile URL. Globally unique per record.
    pub profile_url: String,

    /// Absolute image URL; the site's placeholder image is nulled out.
    pub image_url: Option<String>,

    pub category: Category,
}

/// Fully enriched entity after detail-page extraction.
///
/// Created once, enriched once by the county pass, persisted exactly once
/// per run (idempotent overwrite by `id` on rerun).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Leader {
    pub name: String,
    pub position: String,
    pub constituency: Option<String>,
    pub county: Option<String>,
    pub profile_url: String,
    pub image_url: Option<String>,
    pub category: Category,

    /// Persistence key, from the profile URL's last path segment, or a
    /// slugified name when the URL yields nothing usable.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub election: Option<Election>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    /// Free-text qualifications; entries shorter than 6 characters are
    /// discarded at extraction time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<Position>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promises: Vec<Promise>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendance: Vec<AttendanceRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub committees: Vec<String>,

    /// Never populated from markup today; carried through so existing
    /// artifacts that have it survive a reformat round trip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<serde_json::Value>,

    /// County-assembly sub-listing name, set only for that category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Attendance-derived rating on a 0-5 scale, one decimal.
    #[serde(rename = "approvalRating", skip_serializing_if = "Option::is_none")]
    pub approval_rating: Option<f64>,

    /// First five promise descriptions, present only when promises exist.
    #[serde(
        rename = "keyAchievements",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub key_achievements: Vec<String>,
}

impl Leader {
    /// Builds a bare leader carrying only candidate data. The detail parser
    /// starts from this and fills in whatever sections the page offers.
    pub fn from_candidate(candidate: Candidate) -> Self {
        Self {
            name: candidate.name,
            position: candidate.position,
            constituency: candidate.constituency,
            county: candidate.county,
            profile_url: candidate.profile_url,
            image_url: candidate.image_url,
            category: candidate.category,
            id: String::new(),
            party: None,
            election: None,
            contact: None,
            education: Vec::new(),
            positions: Vec::new(),
            promises: Vec::new(),
            attendance: Vec::new(),
            committees: Vec::new(),
            projects: Vec::new(),
            subcategory: None,
            approval_rating: None,
            key_achievements: Vec::new(),
        }
    }
}

/// Election result details from a profile page.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Election {
    #[serde(rename = "electedDate", skip_serializing_if = "Option::is_none")]
    pub elected_date: Option<String>,

    #[serde(rename = "totalVotes", skip_serializing_if = "Option::is_none")]
    pub total_votes: Option<i64>,
}

impl Election {
    pub fn is_empty(&self) -> bool {
        self.elected_date.is_none() && self.total_votes.is_none()
    }
}

/// Contact details from a profile page.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,

    /// Network name to profile URL; only `twitter` and `facebook` are probed.
    #[serde(
        rename = "socialMedia",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub social_media: BTreeMap<String, String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_empty()
            && self.office.is_none()
            && self.social_media.is_empty()
    }
}

/// One entry of a leader's position history.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Position {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A public statement treated as a campaign promise.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Promise {
    /// Sequential "pr<N>" id scoped to the owning leader.
    pub id: String,

    pub description: String,

    /// Keyword-derived category, see [`crate::promises`].
    pub category: String,

    #[serde(rename = "madeDate", skip_serializing_if = "Option::is_none")]
    pub made_date: Option<String>,

    /// Three years after `madeDate`, derived only for ISO-formatted dates.
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Always "in-progress"; the site publishes no completion data.
    pub status: String,
}

/// One sitting period of a leader's attendance table.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AttendanceRecord {
    pub period: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub absent: Option<i64>,

    /// present + absent, only when both were extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

/// Corpus-wide distributions computed over all scraped leaders.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AggregateStats {
    pub total_leaders: usize,
    pub by_category: BTreeMap<String, u64>,
    pub by_party: BTreeMap<String, u64>,
    pub by_gender: GenderBreakdown,
    pub education_levels: BTreeMap<String, u64>,

    /// Mean, over leaders with at least one rated attendance record, of each
    /// leader's own present/total ratio, as a percentage with 2 decimals.
    pub attendance_average: f64,

    pub projects_total: usize,
    pub promises_by_category: BTreeMap<String, u64>,
}

/// Name-prefix gender estimate. An approximation, not ground truth.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GenderBreakdown {
    pub male: u64,
    pub female: u64,
    pub unknown: u64,
}

/// Per-county leader count entry for `counties_summary.json`.
#[derive(Serialize, Deserialize, Debug)]
pub struct CountySummary {
    pub name: String,
    pub leaders_count: usize,
}

/// Outcome of a full scrape run, printed by the CLI summary.
#[derive(Serialize, Debug, Default)]
pub struct ScrapeReport {
    pub national_assembly: usize,
    pub senate: usize,
    pub county_assemblies: usize,
    pub total: usize,
    pub duration_seconds: u64,
}
