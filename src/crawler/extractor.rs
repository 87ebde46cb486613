//! HTML extractor for visible text and in-scope links
//!
//! This module turns a fetched page into:
//! - Its visible text, one space between text nodes, in document order
//! - The set of canonical, in-scope URLs its anchors point to

use crate::config::LinkBase;
use crate::url::{in_scope, CanonicalUrl};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Elements whose text content is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Text and links extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Visible text nodes joined with single spaces
    pub text: String,

    /// Canonical in-scope link targets
    pub links: BTreeSet<CanonicalUrl>,
}

/// Extracts visible text and in-scope links from a page
///
/// Relative hrefs are resolved against `page_url` or `base_url` depending on
/// `link_base`. Every resolved link has its fragment stripped and is kept
/// only if it passes [`in_scope`] against `base_url`.
///
/// # Example
///
/// ```
/// use sitesift::config::LinkBase;
/// use sitesift::crawler::extract;
/// use sitesift::url::CanonicalUrl;
///
/// let html = r#"<html><body><p>Hello</p><a href="/b#top">B</a></body></html>"#;
/// let page = CanonicalUrl::parse("http://site/a").unwrap();
/// let base = CanonicalUrl::parse("http://site/").unwrap();
///
/// let extracted = extract(html, &page, &base, LinkBase::Page);
/// assert_eq!(extracted.text, "Hello B");
/// assert!(extracted.links.contains(&CanonicalUrl::parse("http://site/b").unwrap()));
/// ```
pub fn extract(
    html: &str,
    page_url: &CanonicalUrl,
    base_url: &CanonicalUrl,
    link_base: LinkBase,
) -> ExtractedPage {
    let document = Html::parse_document(html);

    let resolve_against = match link_base {
        LinkBase::Page => page_url.as_url(),
        LinkBase::Seed => base_url.as_url(),
    };

    let links = extract_links(&document, resolve_against)
        .into_iter()
        .map(CanonicalUrl::from_url)
        .filter(|link| in_scope(link, base_url))
        .collect();

    ExtractedPage {
        text: visible_text(&document),
        links,
    }
}

/// Collapses every whitespace run to one space and trims both ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collects visible text nodes in document order
fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Extracts every followable anchor target as an absolute URL
fn extract_links(document: &Html, resolve_against: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, resolve_against) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (they point back at the same page)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}
