//! HTML parsing for listing pages
//!
//! This module handles:
//! - Decoding fetched bytes into markup
//! - Extracting detail links from a listing page
//! - Finding the next-page control
//! - Resolving relative targets against the page URL

use crate::{HarvestError, Result};
use scraper::{Html, Selector};
use url::Url;

/// Detail links: anchors directly inside list items
const DETAIL_LINK_SELECTOR: &str = "li > a[href]";

/// Pagination: a button carrying an `href`
const NEXT_PAGE_SELECTOR: &str = "button[href]";

/// One parsed page of the listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Detail-page URLs, in document order
    pub detail_urls: Vec<String>,

    /// Target of the next-page control, if the page has one
    pub next_page: Option<String>,
}

/// Decodes fetched bytes as UTF-8 markup
///
/// # Returns
///
/// * `Ok(&str)` - The page markup
/// * `Err(HarvestError::HtmlParse)` - The bytes are not valid UTF-8
pub fn decode_page<'a>(url: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| HarvestError::HtmlParse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Parses a listing page and extracts detail links and the next-page target
///
/// # Extraction Rules
///
/// - Every `li > a[href]`, in document order, duplicates kept
/// - The first `button[href]` is the next-page control
/// - Relative targets are resolved against `page_url`
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `page_url` - The URL the page was fetched from
///
/// # Example
///
/// ```
/// use wanted_harvest::crawler::parse_listing;
/// use url::Url;
///
/// let html = r#"<ul><li><a href="/wanted/a">A</a></li></ul><button href="/list?page=2">More</button>"#;
/// let page_url = Url::parse("https://example.com/list").unwrap();
/// let page = parse_listing(html, &page_url);
/// assert_eq!(page.detail_urls, vec!["https://example.com/wanted/a".to_string()]);
/// assert_eq!(page.next_page, Some("https://example.com/list?page=2".to_string()));
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    let mut detail_urls = Vec::new();
    if let Ok(link_selector) = Selector::parse(DETAIL_LINK_SELECTOR) {
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href") {
                detail_urls.push(resolve_link(href, page_url));
            }
        }
    }

    let next_page = Selector::parse(NEXT_PAGE_SELECTOR).ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .map(|href| resolve_link(href, page_url))
    });

    ListingPage {
        detail_urls,
        next_page,
    }
}

/// Resolves a link target against the page it appeared on
///
/// Targets that cannot be joined are returned trimmed but otherwise as-is.
pub fn resolve_link(href: &str, base_url: &Url) -> String {
    let href = href.trim();
    match base_url.join(href) {
        Ok(absolute_url) => absolute_url.to_string(),
        Err(_) => href.to_string(),
    }
}
