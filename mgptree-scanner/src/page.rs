//! Field extraction from genealogy project HTML pages.

use crate::error::{FetchError, Result};
use crate::record::{PersonId, PersonName, PersonProfile};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const TITLE_SUFFIX: &str = " - The Mathematics Genealogy Project";
const MISSING_RECORD_MARKER: &str = "does not exist in the database";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FetchError::ParseError(format!("selector '{}': {}", css, e)))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: &str) -> Option<String> {
    let text = collapse_whitespace(text);
    if text.is_empty() { None } else { Some(text) }
}

/// Pull the numeric id out of an `id.php?id=N` link.
pub fn parse_id_from_href(href: &str) -> Option<PersonId> {
    let (_, tail) = href.split_once("id.php?id=")?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extract a [`PersonProfile`] from a record page.
pub fn extract_profile(id: PersonId, html: &str) -> Result<PersonProfile> {
    let document = Html::parse_document(html);

    let name = extract_name(&document)?.ok_or(FetchError::NotFound(id))?;
    let mut profile = PersonProfile::new(id, name);

    let degree_selector = selector(r#"span[style*="margin-right: 0.5em"]"#)?;
    if let Some(degree) = document.select(&degree_selector).next() {
        let (title, institution, year) = split_degree_line(degree);
        profile.title = title;
        profile.institution = institution;
        profile.year = year;
    }

    profile.advisors = extract_advisors(&document)?;
    debug!(
        "Extracted record {}: {} ({} advisors)",
        id,
        profile.name.label(),
        profile.advisors.len()
    );

    Ok(profile)
}

fn extract_name(document: &Html) -> Result<Option<PersonName>> {
    let body_text: String = document.root_element().text().collect();
    if body_text.contains(MISSING_RECORD_MARKER) {
        return Ok(None);
    }

    let heading_selector = selector("h2")?;
    let heading = document
        .select(&heading_selector)
        .map(|h| collapse_whitespace(&h.text().collect::<String>()))
        .find(|text| !text.is_empty());

    let display = match heading {
        Some(text) => Some(text),
        None => {
            let title_selector = selector("title")?;
            document
                .select(&title_selector)
                .next()
                .map(|t| collapse_whitespace(&t.text().collect::<String>()))
                .and_then(|t| t.strip_suffix(TITLE_SUFFIX).map(str::to_string))
        }
    };

    Ok(display.as_deref().and_then(PersonName::from_display))
}

/// The degree line reads `Ph.D. <span>Institution</span> 1938`.
fn split_degree_line(span: ElementRef<'_>) -> (Option<String>, Option<String>, Option<String>) {
    let mut before = String::new();
    let mut institution: Option<String> = None;
    let mut after = String::new();

    for child in span.children() {
        if let Some(element) = ElementRef::wrap(child) {
            if institution.is_none() {
                institution = Some(element.text().collect());
            }
        } else if let Some(text) = child.value().as_text() {
            if institution.is_none() {
                before.push_str(&text.text);
            } else {
                after.push_str(&text.text);
            }
        }
    }

    (
        non_empty(&before),
        institution.as_deref().and_then(non_empty),
        non_empty(&after),
    )
}

/// Advisor ids in page order, without duplicates.
fn extract_advisors(document: &Html) -> Result<Vec<PersonId>> {
    let paragraph_selector = selector("p")?;
    let link_selector = selector("a[href]")?;

    let mut advisors = Vec::new();
    for paragraph in document.select(&paragraph_selector) {
        let text: String = paragraph.text().collect();
        if !text.trim_start().starts_with("Advisor") {
            continue;
        }
        for link in paragraph.select(&link_selector) {
            if let Some(advisor) = link.value().attr("href").and_then(parse_id_from_href)
                && !advisors.contains(&advisor)
            {
                advisors.push(advisor);
            }
        }
    }
    Ok(advisors)
}

/// Rows of a name search: `(id, "Last, First Middle")`.
pub fn extract_search_results(html: &str) -> Result<Vec<(PersonId, String)>> {
    let document = Html::parse_document(html);
    let row_link_selector = selector("td a[href]")?;

    let results = document
        .select(&row_link_selector)
        .filter_map(|link| {
            let id = link.value().attr("href").and_then(parse_id_from_href)?;
            Some((id, collapse_whitespace(&link.text().collect::<String>())))
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURING_PAGE: &str = r#"<html><head>
<title>Alan Turing - The Mathematics Genealogy Project</title></head>
<body>
<div id="paddingWrapper">
<h2 style="text-align: center; margin-bottom: 0.5ex; margin-top: 1ex">
Alan Mathison  Turing
</h2>
<div style="line-height: 30px; text-align: center; margin-bottom: 1ex">
<span style="margin-right: 0.5em">Ph.D. <span style="color:
#006633; margin-left: 0.5em">Princeton University</span> 1938</span>
</div>
<p style="text-align: center; line-height: 2.75ex">Advisor: <a href="id.php?id=8011">Alonzo Church</a></p>
<p style="text-align: center">Students:</p>
<table><tr><td><a href="id.php?id=21122">Robin Gandy</a></td></tr></table>
</div></body></html>"#;

    #[test]
    fn test_parse_id_from_href() {
        assert_eq!(parse_id_from_href("id.php?id=8581"), Some(8581));
        assert_eq!(parse_id_from_href("https://x.org/id.php?id=42&fChrono=1"), Some(42));
        assert_eq!(parse_id_from_href("search.php"), None);
        assert_eq!(parse_id_from_href("id.php?id="), None);
    }

    #[test]
    fn test_extract_profile_fields() {
        let profile = extract_profile(8581, TURING_PAGE).unwrap();
        assert_eq!(profile.id, 8581);
        assert_eq!(profile.name.label(), "Alan Mathison Turing");
        assert_eq!(profile.title.as_deref(), Some("Ph.D."));
        assert_eq!(profile.institution.as_deref(), Some("Princeton University"));
        assert_eq!(profile.year.as_deref(), Some("1938"));
        // Student links must not be mistaken for advisors.
        assert_eq!(profile.advisors, vec![8011]);
    }

    #[test]
    fn test_extract_profile_two_advisors() {
        let html = r#"<html><body><h2>Oswald Veblen</h2>
<p>Advisor 1: <a href="id.php?id=10">E. H. Moore</a><br />Advisor 2: <a href="id.php?id=11">Someone Else</a>
<a href="id.php?id=10">again</a></p></body></html>"#;
        let profile = extract_profile(7, html).unwrap();
        assert_eq!(profile.advisors, vec![10, 11]);
        assert_eq!(profile.institution, None);
    }

    #[test]
    fn test_extract_profile_unknown_advisor() {
        let html = "<html><body><h2>Euclid</h2><p>Advisor: Unknown</p></body></html>";
        let profile = extract_profile(1, html).unwrap();
        assert!(profile.advisors.is_empty());
    }

    #[test]
    fn test_extract_profile_falls_back_to_title() {
        let html = "<html><head><title>Emmy Noether - The Mathematics Genealogy Project</title></head><body></body></html>";
        let profile = extract_profile(6967, html).unwrap();
        assert_eq!(profile.name.label(), "Emmy Noether");
    }

    #[test]
    fn test_extract_profile_missing_record() {
        let html = "<html><body><p>You have specified an ID that does not exist in the database. Please back up and try again.</p></body></html>";
        assert!(matches!(extract_profile(999999, html), Err(FetchError::NotFound(999999))));
    }

    #[test]
    fn test_extract_search_results() {
        let html = r#"<html><body><table>
<tr><td><a href="id.php?id=8581">Turing, Alan</a></td><td>Princeton University</td><td>1938</td></tr>
<tr><td><a href="id.php?id=99">Turing,   Dermot</a></td><td></td><td></td></tr>
</table></body></html>"#;
        let results = extract_search_results(html).unwrap();
        assert_eq!(
            results,
            vec![(8581, "Turing, Alan".to_string()), (99, "Turing, Dermot".to_string())]
        );
    }
}
