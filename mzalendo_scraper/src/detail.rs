//! Profile-page extraction into a full leader record.
//!
//! Every optional sub-section is probed independently with a primary selector
//! and a fallback, so a markup change in one section never costs the others.
//! A section that matches nothing is simply omitted from the record.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::model::{AttendanceRecord, Candidate, Contact, Election, Leader, Position, Promise};
use crate::promises;

static PARTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Member of ([\w\s\-]+)").expect("invalid party regex"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid digits regex"));
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid date regex"));

fn sel(raw: &str) -> Selector {
    Selector::parse(raw).expect("invalid static selector")
}

/// Precompiled selectors for every probed section, primary and fallback.
struct Selectors {
    party: Selector,
    location: Selector,
    election: Selector,
    election_date: Selector,
    election_votes: Selector,
    contact: Selector,
    contact_fallback: Selector,
    mailto: Selector,
    tel: Selector,
    address: Selector,
    twitter: Selector,
    facebook: Selector,
    experience: Selector,
    experience_fallback: Selector,
    education_entry: Selector,
    education_fallback: Selector,
    qualification: Selector,
    position_entry: Selector,
    position_fallback: Selector,
    position_title: Selector,
    position_org: Selector,
    position_date: Selector,
    statement: Selector,
    statement_fallback: Selector,
    statement_date: Selector,
    statement_text: Selector,
    text_fallback: Selector,
    date: Selector,
    attendance: Selector,
    attendance_fallback: Selector,
    attendance_entry: Selector,
    table_row: Selector,
    header_cell: Selector,
    period: Selector,
    present: Selector,
    absent: Selector,
    first_cell: Selector,
    second_cell: Selector,
    third_cell: Selector,
    committees: Selector,
    committees_fallback: Selector,
    committee_entry: Selector,
    list_item: Selector,
}

static SEL: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    party: sel(".person-party-membership"),
    location: sel(".location a"),
    election: sel(".election-results"),
    election_date: sel(".date"),
    election_votes: sel(".votes"),
    contact: sel("#contact"),
    contact_fallback: sel(".contact-details"),
    mailto: sel(r#"a[href^="mailto:"]"#),
    tel: sel(r#"a[href^="tel:"]"#),
    address: sel(".address"),
    twitter: sel(r#"a[href*="twitter.com"]"#),
    facebook: sel(r#"a[href*="facebook.com"]"#),
    experience: sel("#experience"),
    experience_fallback: sel(".person-detail-experience"),
    education_entry: sel(".education-entry"),
    education_fallback: sel(".education"),
    qualification: sel(".qualification"),
    position_entry: sel(".position-entry"),
    position_fallback: sel(".position"),
    position_title: sel(".position-title"),
    position_org: sel(".position-org"),
    position_date: sel(".position-date"),
    statement: sel("#statements .statement"),
    statement_fallback: sel(".statement"),
    statement_date: sel(".statement-date"),
    statement_text: sel(".statement-text"),
    text_fallback: sel(".text"),
    date: sel(".date"),
    attendance: sel("#attendance"),
    attendance_fallback: sel(".attendance"),
    attendance_entry: sel(".attendance-record"),
    table_row: sel("table tr"),
    header_cell: sel("th"),
    period: sel(".period"),
    present: sel(".present"),
    absent: sel(".absent"),
    first_cell: sel("td:nth-child(1)"),
    second_cell: sel("td:nth-child(2)"),
    third_cell: sel("td:nth-child(3)"),
    committees: sel("#committees"),
    committees_fallback: sel(".committees"),
    committee_entry: sel(".committee"),
    list_item: sel("li"),
});

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed, non-empty text of the first match under `scope`.
fn scoped_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(elem_text)
        .filter(|text| !text.is_empty())
}

/// First match of `primary`, falling back to `fallback` when it finds nothing.
fn section<'a>(
    document: &'a Html,
    primary: &Selector,
    fallback: &Selector,
) -> Option<ElementRef<'a>> {
    document
        .select(primary)
        .next()
        .or_else(|| document.select(fallback).next())
}

/// First integer embedded in the element's text, if any.
fn first_number(text: &str) -> Option<i64> {
    DIGITS_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Parses a profile page into a leader record.
///
/// Starts from the candidate's summary data and layers on whatever the page
/// offers; a section the markup lacks is left out, never an error. Derived
/// fields (`approvalRating`, `keyAchievements`) are computed last from the
/// parsed data.
pub fn parse_detail(html: &str, candidate: &Candidate) -> Leader {
    let document = Html::parse_document(html);
    let mut leader = Leader::from_candidate(candidate.clone());
    leader.id = id_from_profile_url(&leader.profile_url, &leader.name);

    leader.party = parse_party(&document);
    if let Some(county) = parse_county(&document) {
        leader.county = Some(county);
    }
    leader.election = parse_election(&document);
    leader.contact = parse_contact(&document);
    (leader.education, leader.positions) = parse_experience(&document);
    leader.promises = parse_promises(&document);
    leader.attendance = parse_attendance(&document);
    leader.committees = parse_committees(&document);

    leader.approval_rating = approval_rating(&leader.attendance);
    if !leader.promises.is_empty() {
        leader.key_achievements = leader
            .promises
            .iter()
            .take(5)
            .map(|promise| promise.description.clone())
            .collect();
    }

    leader
}

/// Last non-empty path segment of the profile URL, else a slug of the name.
fn id_from_profile_url(profile_url: &str, name: &str) -> String {
    profile_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(str::to_string)
        .unwrap_or_else(|| name.to_lowercase().replace(' ', "-"))
}

fn parse_party(document: &Html) -> Option<String> {
    let text = scoped_text(document.root_element(), &SEL.party)?;
    PARTY_RE
        .captures(&text)
        .map(|caps| caps[1].trim().to_string())
}

fn parse_county(document: &Html) -> Option<String> {
    let text = scoped_text(document.root_element(), &SEL.location)?;
    if text.contains("County") {
        Some(text.replace("County", "").trim().to_string())
    } else {
        None
    }
}

fn parse_election(document: &Html) -> Option<Election> {
    let scope = document.select(&SEL.election).next()?;
    let election = Election {
        elected_date: scoped_text(scope, &SEL.election_date),
        total_votes: scoped_text(scope, &SEL.election_votes)
            .as_deref()
            .and_then(first_number),
    };
    (!election.is_empty()).then_some(election)
}

fn parse_contact(document: &Html) -> Option<Contact> {
    let scope = section(document, &SEL.contact, &SEL.contact_fallback)?;

    let email = scope
        .select(&SEL.mailto)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim_start_matches("mailto:").trim().to_string());

    let phone = scope
        .select(&SEL.tel)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| href.trim_start_matches("tel:").trim().to_string())
        .collect();

    let office = scoped_text(scope, &SEL.address);

    let mut social_media = std::collections::BTreeMap::new();
    for (network, selector) in [("twitter", &SEL.twitter), ("facebook", &SEL.facebook)] {
        if let Some(href) = scope
            .select(selector)
            .next()
            .and_then(|link| link.value().attr("href"))
        {
            social_media.insert(network.to_string(), href.trim().to_string());
        }
    }

    let contact = Contact {
        email,
        phone,
        office,
        social_media,
    };
    (!contact.is_empty()).then_some(contact)
}

fn parse_experience(document: &Html) -> (Vec<String>, Vec<Position>) {
    let Some(scope) = section(document, &SEL.experience, &SEL.experience_fallback) else {
        return (Vec::new(), Vec::new());
    };

    let mut education_entries: Vec<ElementRef> = scope.select(&SEL.education_entry).collect();
    if education_entries.is_empty() {
        education_entries = scope.select(&SEL.education_fallback).collect();
    }
    let education = education_entries
        .into_iter()
        .map(|entry| {
            scoped_text(entry, &SEL.qualification).unwrap_or_else(|| elem_text(entry))
        })
        // Entries of 5 characters or fewer are noise, not qualifications.
        .filter(|text| text.chars().count() > 5)
        .collect();

    let mut position_entries: Vec<ElementRef> = scope.select(&SEL.position_entry).collect();
    if position_entries.is_empty() {
        position_entries = scope.select(&SEL.position_fallback).collect();
    }
    let positions = position_entries
        .into_iter()
        .filter_map(|entry| {
            let title = scoped_text(entry, &SEL.position_title).unwrap_or_else(|| elem_text(entry));
            if title.is_empty() {
                return None;
            }
            Some(Position {
                title,
                organization: scoped_text(entry, &SEL.position_org),
                date: scoped_text(entry, &SEL.position_date)
                    .or_else(|| scoped_text(entry, &SEL.date)),
            })
        })
        .collect();

    (education, positions)
}

fn parse_promises(document: &Html) -> Vec<Promise> {
    let mut statements: Vec<ElementRef> = document.select(&SEL.statement).collect();
    if statements.is_empty() {
        statements = document.select(&SEL.statement_fallback).collect();
    }

    let mut promises = Vec::new();
    for statement in statements {
        let Some(description) = scoped_text(statement, &SEL.statement_text)
            .or_else(|| scoped_text(statement, &SEL.text_fallback))
        else {
            continue;
        };

        let made_date = scoped_text(statement, &SEL.statement_date)
            .or_else(|| scoped_text(statement, &SEL.date));
        let due_date = made_date.as_deref().and_then(due_date_for);

        promises.push(Promise {
            id: format!("pr{}", promises.len() + 1),
            category: promises::categorize(&description).to_string(),
            description,
            made_date,
            due_date,
            status: "in-progress".to_string(),
        });
    }
    promises
}

/// Three years after an ISO `YYYY-MM-DD` date, month and day kept verbatim.
/// Non-ISO dates produce no due date, and no calendar validation happens, so
/// a Feb 29 made-date yields a Feb 29 due date regardless of leap years.
fn due_date_for(made_date: &str) -> Option<String> {
    if !ISO_DATE_RE.is_match(made_date) {
        return None;
    }
    let mut parts = made_date.splitn(2, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month_day = parts.next()?;
    Some(format!("{}-{}", year + 3, month_day))
}

fn parse_attendance(document: &Html) -> Vec<AttendanceRecord> {
    let Some(scope) = section(document, &SEL.attendance, &SEL.attendance_fallback) else {
        return Vec::new();
    };

    let mut entries: Vec<ElementRef> = scope.select(&SEL.attendance_entry).collect();
    if entries.is_empty() {
        entries = scope.select(&SEL.table_row).collect();
    }

    let mut records = Vec::new();
    for entry in entries {
        // Header rows carry th cells, not data.
        if entry.select(&SEL.header_cell).next().is_some() {
            continue;
        }
        let Some(period) = scoped_text(entry, &SEL.period)
            .or_else(|| scoped_text(entry, &SEL.first_cell))
        else {
            continue;
        };

        let present = scoped_text(entry, &SEL.present)
            .or_else(|| scoped_text(entry, &SEL.second_cell))
            .as_deref()
            .and_then(first_number);
        let absent = scoped_text(entry, &SEL.absent)
            .or_else(|| scoped_text(entry, &SEL.third_cell))
            .as_deref()
            .and_then(first_number);
        let total = match (present, absent) {
            (Some(present), Some(absent)) => Some(present + absent),
            _ => None,
        };

        records.push(AttendanceRecord {
            period,
            present,
            absent,
            total,
        });
    }
    records
}

fn parse_committees(document: &Html) -> Vec<String> {
    let Some(scope) = section(document, &SEL.committees, &SEL.committees_fallback) else {
        return Vec::new();
    };

    let mut entries: Vec<ElementRef> = scope.select(&SEL.committee_entry).collect();
    if entries.is_empty() {
        entries = scope.select(&SEL.list_item).collect();
    }
    entries
        .into_iter()
        .map(elem_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Overall present/total ratio scaled to a 0-5 rating with one decimal, over
/// all attendance entries. None when no entry contributed a total.
fn approval_rating(attendance: &[AttendanceRecord]) -> Option<f64> {
    let total_present: i64 = attendance.iter().filter_map(|record| record.present).sum();
    let total_sessions: i64 = attendance.iter().filter_map(|record| record.total).sum();
    if total_sessions > 0 {
        Some((total_present as f64 / total_sessions as f64 * 5.0 * 10.0).round() / 10.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn candidate() -> Candidate {
        Candidate {
            name: "Hon. Jane Wanjiku".to_string(),
            position: "Member for Kamukunji Constituency".to_string(),
            constituency: Some("Kamukunji".to_string()),
            county: None,
            profile_url: "https://mzalendo.com/person/jane-wanjiku/".to_string(),
            image_url: None,
            category: Category::NationalAssembly,
        }
    }

    const FULL_PROFILE: &str = r#"
        <div class="person-party-membership">Member of Jubilee Party</div>
        <div class="location"><a href="/place/nairobi/">Nairobi County</a></div>
        <div class="election-results">
          <span class="date">2022-08-09</span>
          <span class="votes">Won with 45230 votes</span>
        </div>
        <div id="contact">
          <a href="mailto:jane@parliament.go.ke">Email</a>
          <a href="tel:+254700000001">Call</a>
          <a href="tel:+254700000002">Call</a>
          <div class="address">Parliament Buildings, Nairobi</div>
          <a href="https://twitter.com/janewanjiku">Twitter</a>
        </div>
        <div id="experience">
          <div class="education-entry"><span class="qualification">MBA, University of Nairobi</span></div>
          <div class="education-entry"><span class="qualification">BSc</span></div>
          <div class="position-entry">
            <span class="position-title">Committee Chair</span>
            <span class="position-org">Budget Committee</span>
            <span class="position-date">2018</span>
          </div>
        </div>
        <div id="statements">
          <div class="statement">
            <span class="statement-date">2021-05-10</span>
            <span class="statement-text">Build a new school in every ward</span>
          </div>
          <div class="statement">
            <span class="statement-date">10 May 2021</span>
            <span class="statement-text">Tarmac the feeder roads</span>
          </div>
        </div>
        <div id="attendance">
          <table>
            <tr><th>Period</th><th>Present</th><th>Absent</th></tr>
            <tr><td>2021</td><td>8</td><td>2</td></tr>
            <tr><td>2022</td><td>4</td><td>1</td></tr>
          </table>
        </div>
        <div id="committees">
          <ul><li>Budget and Appropriations</li><li>Education</li></ul>
        </div>
    "#;

    #[test]
    fn full_profile_parses_every_section() {
        let leader = parse_detail(FULL_PROFILE, &candidate());

        assert_eq!(leader.id, "jane-wanjiku");
        assert_eq!(leader.party.as_deref(), Some("Jubilee Party"));
        assert_eq!(leader.county.as_deref(), Some("Nairobi"));

        let election = leader.election.as_ref().unwrap();
        assert_eq!(election.elected_date.as_deref(), Some("2022-08-09"));
        assert_eq!(election.total_votes, Some(45230));

        let contact = leader.contact.as_ref().unwrap();
        assert_eq!(contact.email.as_deref(), Some("jane@parliament.go.ke"));
        assert_eq!(contact.phone, vec!["+254700000001", "+254700000002"]);
        assert_eq!(
            contact.office.as_deref(),
            Some("Parliament Buildings, Nairobi")
        );
        assert_eq!(
            contact.social_media.get("twitter").map(String::as_str),
            Some("https://twitter.com/janewanjiku")
        );
        assert!(!contact.social_media.contains_key("facebook"));

        // The 3-character "BSc" entry is discarded.
        assert_eq!(leader.education, vec!["MBA, University of Nairobi"]);
        assert_eq!(leader.positions.len(), 1);
        assert_eq!(leader.positions[0].title, "Committee Chair");
        assert_eq!(
            leader.positions[0].organization.as_deref(),
            Some("Budget Committee")
        );

        assert_eq!(leader.committees.len(), 2);
    }

    #[test]
    fn promises_get_sequential_ids_and_categories() {
        let leader = parse_detail(FULL_PROFILE, &candidate());
        assert_eq!(leader.promises.len(), 2);

        let first = &leader.promises[0];
        assert_eq!(first.id, "pr1");
        assert_eq!(first.category, "Education");
        assert_eq!(first.made_date.as_deref(), Some("2021-05-10"));
        assert_eq!(first.due_date.as_deref(), Some("2024-05-10"));
        assert_eq!(first.status, "in-progress");

        // Non-ISO made date: no due date derived.
        let second = &leader.promises[1];
        assert_eq!(second.id, "pr2");
        assert_eq!(second.category, "Infrastructure");
        assert_eq!(second.made_date.as_deref(), Some("10 May 2021"));
        assert!(second.due_date.is_none());
    }

    #[test]
    fn attendance_and_derived_fields() {
        let leader = parse_detail(FULL_PROFILE, &candidate());

        assert_eq!(leader.attendance.len(), 2);
        assert_eq!(leader.attendance[0].present, Some(8));
        assert_eq!(leader.attendance[0].absent, Some(2));
        assert_eq!(leader.attendance[0].total, Some(10));

        // (8 + 4) / (10 + 5) = 0.8 -> 4.0 on the 5-point scale.
        assert_eq!(leader.approval_rating, Some(4.0));
        assert_eq!(leader.key_achievements.len(), 2);
        assert_eq!(leader.key_achievements[0], "Build a new school in every ward");
    }

    #[test]
    fn fallback_selectors_are_probed() {
        let html = r#"
            <div class="contact-details">
              <a href="mailto:x@y.ke">Email</a>
            </div>
            <div class="person-detail-experience">
              <div class="education">Diploma in Public Administration</div>
            </div>
            <div class="statement">
              <span class="date">2020-01-02</span>
              <span class="text">Drill a borehole in every village</span>
            </div>
            <div class="attendance">
              <div class="attendance-record">
                <span class="period">2020</span>
                <span class="present">12</span>
                <span class="absent">3</span>
              </div>
            </div>
            <div class="committees"><div class="committee">Water</div></div>
        "#;
        let leader = parse_detail(html, &candidate());

        assert_eq!(
            leader.contact.as_ref().unwrap().email.as_deref(),
            Some("x@y.ke")
        );
        assert_eq!(leader.education, vec!["Diploma in Public Administration"]);
        assert_eq!(leader.promises[0].category, "Water");
        assert_eq!(leader.promises[0].due_date.as_deref(), Some("2023-01-02"));
        assert_eq!(leader.attendance[0].total, Some(15));
        assert_eq!(leader.committees, vec!["Water"]);
    }

    #[test]
    fn empty_page_falls_back_to_candidate_data() {
        let leader = parse_detail("<html><body></body></html>", &candidate());
        assert_eq!(leader.id, "jane-wanjiku");
        assert_eq!(leader.name, "Hon. Jane Wanjiku");
        assert!(leader.party.is_none());
        assert!(leader.election.is_none());
        assert!(leader.contact.is_none());
        assert!(leader.promises.is_empty());
        assert!(leader.approval_rating.is_none());
        assert!(leader.key_achievements.is_empty());
    }

    #[test]
    fn partial_attendance_rows_skip_total() {
        let html = r#"
            <div class="attendance">
              <table>
                <tr><td>2021</td><td>7</td></tr>
              </table>
            </div>
        "#;
        let leader = parse_detail(html, &candidate());
        assert_eq!(leader.attendance[0].present, Some(7));
        assert!(leader.attendance[0].absent.is_none());
        assert!(leader.attendance[0].total.is_none());
        assert!(leader.approval_rating.is_none());
    }

    #[test]
    fn id_falls_back_to_name_slug() {
        assert_eq!(
            id_from_profile_url("https://", "Jane Wanjiku"),
            "jane-wanjiku"
        );
        assert_eq!(
            id_from_profile_url("https://mzalendo.com/person/abc/", "x"),
            "abc"
        );
    }

    #[test]
    fn due_date_keeps_month_and_day_verbatim() {
        assert_eq!(due_date_for("2021-05-10").as_deref(), Some("2024-05-10"));
        // No calendar validation: Feb 29 survives into a non-leap year.
        assert_eq!(due_date_for("2024-02-29").as_deref(), Some("2027-02-29"));
        assert!(due_date_for("10 May 2021").is_none());
        assert!(due_date_for("2021-05-10 ").is_none());
    }
}
