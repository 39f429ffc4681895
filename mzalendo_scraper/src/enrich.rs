//! Post-extraction enrichment: inferring county from constituency.

use crate::model::Leader;

/// Known constituency-to-county mappings. Deliberately incomplete; a
/// constituency not listed here leaves the county unset, which is not an
/// error.
const CONSTITUENCY_COUNTIES: &[(&str, &str)] = &[
    ("Tarbaj", "Wajir"),
    ("Lafey", "Mandera"),
    ("Kamukunji", "Nairobi"),
    ("Rongo", "Migori"),
    ("Tigania East", "Meru"),
    ("Wajir East", "Wajir"),
    ("Wajir South", "Wajir"),
    ("Bura", "Tana River"),
    ("Lomas", "Tana River"),
    ("Bomachoge Chache", "Kisii"),
    ("Ijara", "Garissa"),
    ("Nyali", "Mombasa"),
    ("Rangwe", "Homa Bay"),
    ("Turkana South", "Turkana"),
];

/// Looks up the county a constituency belongs to.
pub fn county_for_constituency(constituency: &str) -> Option<&'static str> {
    CONSTITUENCY_COUNTIES
        .iter()
        .find(|(name, _)| *name == constituency)
        .map(|(_, county)| *county)
}

/// Fills in the county of every leader that has a constituency but no county
/// yet. Leaders the table cannot resolve are left untouched.
pub fn enrich(leaders: &mut [Leader]) {
    for leader in leaders.iter_mut() {
        if leader.county.is_some() {
            continue;
        }
        if let Some(constituency) = leader
            .constituency
            .as_deref()
            .filter(|name| !name.is_empty())
        {
            leader.county = county_for_constituency(constituency).map(str::to_string);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, Category, Leader};

    fn leader(constituency: Option<&str>, county: Option<&str>) -> Leader {
        Leader::from_candidate(Candidate {
            name: "Test".to_string(),
            position: "Member".to_string(),
            constituency: constituency.map(str::to_string),
            county: county.map(str::to_string),
            profile_url: "https://mzalendo.com/person/test/".to_string(),
            image_url: None,
            category: Category::NationalAssembly,
        })
    }

    #[test]
    fn fills_missing_county_from_table() {
        let mut leaders = vec![leader(Some("Nyali"), None)];
        enrich(&mut leaders);
        assert_eq!(leaders[0].county.as_deref(), Some("Mombasa"));
    }

    #[test]
    fn existing_county_is_kept() {
        let mut leaders = vec![leader(Some("Nyali"), Some("Elsewhere"))];
        enrich(&mut leaders);
        assert_eq!(leaders[0].county.as_deref(), Some("Elsewhere"));
    }

    #[test]
    fn unmapped_constituency_stays_unset() {
        let mut leaders = vec![leader(Some("Langata"), None), leader(None, None)];
        enrich(&mut leaders);
        assert!(leaders[0].county.is_none());
        assert!(leaders[1].county.is_none());
    }
}
