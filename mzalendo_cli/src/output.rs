//! Flattened output projection over `all_leaders.json`.
//!
//! A pure reshaping of already-scraped records into the schema some
//! downstream consumers expect; no new data is computed here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use mzalendo_scraper::model::{AttendanceRecord, Promise};
use mzalendo_scraper::Leader;

/// Flattened leader shape exposing a subset of record fields.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FlatLeader {
    pub id: String,
    pub name: String,
    pub position: String,
    pub county: String,
    pub party: String,
    pub image_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elected_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_votes: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<FlatContact>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub promises: Vec<Promise>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendance: Vec<AttendanceRecord>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_achievements: Vec<String>,
}

/// Contact block of the flattened shape. Email and office collapse to empty
/// strings when absent, matching the consumer schema.
#[derive(Serialize, Debug)]
pub struct FlatContact {
    pub email: String,
    pub office: String,

    #[serde(rename = "socialMedia", skip_serializing_if = "BTreeMap::is_empty")]
    pub social_media: BTreeMap<String, String>,
}

/// Projects a full leader record onto the flattened shape.
pub fn flatten(leader: &Leader) -> FlatLeader {
    let election = leader.election.as_ref();
    FlatLeader {
        id: leader.id.to_lowercase().replace(' ', "-"),
        name: leader.name.clone(),
        position: leader.position.clone(),
        county: leader.county.clone().unwrap_or_default(),
        party: leader.party.clone().unwrap_or_default(),
        image_url: leader.image_url.clone().unwrap_or_default(),
        elected_date: election.and_then(|e| e.elected_date.clone()),
        approval_rating: leader.approval_rating,
        total_votes: election.and_then(|e| e.total_votes),
        contact: leader.contact.as_ref().map(|contact| FlatContact {
            email: contact.email.clone().unwrap_or_default(),
            office: contact.office.clone().unwrap_or_default(),
            social_media: contact.social_media.clone(),
        }),
        education: leader.education.clone(),
        projects: leader.projects.clone(),
        promises: leader.promises.clone(),
        attendance: leader.attendance.clone(),
        key_achievements: leader.key_achievements.clone(),
    }
}

/// Reads `all_leaders.json` under `output_dir` and writes the flattened
/// projection next to it as `formatted_leaders.json`. A missing corpus file
/// is a no-op, not an error; per-category runs never produce one.
pub fn write_flat_leaders(output_dir: &Path) -> Result<()> {
    let corpus = output_dir.join("all_leaders.json");
    if !corpus.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&corpus)
        .with_context(|| format!("reading {}", corpus.display()))?;
    let leaders: Vec<Leader> = serde_json::from_str(&raw)?;
    let formatted: Vec<FlatLeader> = leaders.iter().map(flatten).collect();

    let target = output_dir.join("formatted_leaders.json");
    fs::write(&target, serde_json::to_string_pretty(&formatted)?)
        .with_context(|| format!("writing {}", target.display()))?;
    println!("Formatted output saved to {}", target.display());
    Ok(())
}
