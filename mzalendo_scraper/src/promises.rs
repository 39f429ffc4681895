//! Keyword-based categorization of free-text promises.

/// Ordered category table. Declaration order is the tie-break: a promise
/// mentioning both a school and a hospital is Education, not Healthcare.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Education",
        &["education", "school", "university", "college", "student", "learning"],
    ),
    (
        "Healthcare",
        &["health", "hospital", "medical", "clinic", "doctor", "disease", "treatment"],
    ),
    (
        "Infrastructure",
        &["road", "bridge", "building", "construction", "infrastructure"],
    ),
    ("Water", &["water", "irrigation", "dam", "borehole", "pipeline"]),
    (
        "Agriculture",
        &["farm", "agriculture", "crop", "livestock", "cattle", "dairy"],
    ),
    (
        "Economy",
        &["economy", "business", "enterprise", "job", "employment", "income"],
    ),
    ("Security", &["security", "police", "crime", "safety"]),
];

/// Classifies a promise as the first category with a keyword appearing in the
/// text, case-insensitively. No match yields "Other".
pub fn categorize(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    for (category, keywords) in CATEGORIES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return category;
        }
    }
    "Other"
}

#[cfg(test)]
mod tests {
    use super::categorize;

    #[test]
    fn earlier_category_wins_ties() {
        // Mentions both a school and a hospital; Education is declared first.
        assert_eq!(
            categorize("Build a school next to the county hospital"),
            "Education"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(categorize("UPGRADE THE BOREHOLE"), "Water");
        assert_eq!(categorize("More Police patrols"), "Security");
    }

    #[test]
    fn unmatched_text_is_other() {
        assert_eq!(categorize("Hold a town hall every month"), "Other");
    }

    #[test]
    fn keyword_matches_as_substring() {
        // "jobs" contains the "job" keyword.
        assert_eq!(categorize("Create 500 jobs for the youth"), "Economy");
    }
}
