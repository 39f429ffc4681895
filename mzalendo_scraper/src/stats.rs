//! Corpus-wide statistics over scraped leaders.

use crate::model::{AggregateStats, Leader};

/// Ordered education tiers; the first tier with a matching keyword wins, so
/// "Masters degree" counts as Masters, not Bachelors.
const EDUCATION_TIERS: &[(&str, &[&str])] = &[
    ("PhD", &["phd", "doctorate"]),
    ("Masters", &["master"]),
    ("Bachelors", &["bachelor", "degree"]),
    ("Diploma", &["diploma"]),
    ("Certificate", &["certificate"]),
];

fn education_tier(entry: &str) -> &'static str {
    let lowered = entry.to_lowercase();
    EDUCATION_TIERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(tier, _)| *tier)
        .unwrap_or("unknown")
}

/// Computes corpus-wide distributions in a single pass.
///
/// Pure function of the input; missing optional data lands in the unknown or
/// zero bucket and never aborts the computation.
pub fn compute_stats(leaders: &[Leader]) -> AggregateStats {
    let mut stats = AggregateStats {
        total_leaders: leaders.len(),
        ..AggregateStats::default()
    };

    let mut attendance_sum = 0.0;
    let mut leaders_with_attendance = 0u64;

    for leader in leaders {
        *stats
            .by_category
            .entry(leader.category.to_string())
            .or_insert(0) += 1;

        let party = leader.party.as_deref().unwrap_or("unknown");
        *stats.by_party.entry(party.to_string()).or_insert(0) += 1;

        // Title-prefix gender estimate; a rough placeholder for real data.
        let position = leader.position.to_lowercase();
        if leader.name.starts_with("Ms.")
            || leader.name.starts_with("Mrs.")
            || position.contains("women")
        {
            stats.by_gender.female += 1;
        } else if leader.name.starts_with("Mr.") || leader.name.starts_with("Hon.") {
            stats.by_gender.male += 1;
        } else {
            stats.by_gender.unknown += 1;
        }

        for entry in &leader.education {
            *stats
                .education_levels
                .entry(education_tier(entry).to_string())
                .or_insert(0) += 1;
        }

        let mut ratio_sum = 0.0;
        let mut rated_records = 0u32;
        for record in &leader.attendance {
            if let (Some(present), Some(total)) = (record.present, record.total) {
                if total > 0 {
                    ratio_sum += present as f64 / total as f64;
                    rated_records += 1;
                }
            }
        }
        if rated_records > 0 {
            attendance_sum += ratio_sum / f64::from(rated_records) * 100.0;
            leaders_with_attendance += 1;
        }

        stats.projects_total += leader.projects.len();

        for promise in &leader.promises {
            *stats
                .promises_by_category
                .entry(promise.category.clone())
                .or_insert(0) += 1;
        }
    }

    if leaders_with_attendance > 0 {
        stats.attendance_average =
            (attendance_sum / leaders_with_attendance as f64 * 100.0).round() / 100.0;
    }

    stats
}
