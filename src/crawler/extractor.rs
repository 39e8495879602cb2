//! Entry extractor - maps one detail page onto a [`Record`]
//!
//! The page is fetched through the blob cache, parsed, and queried with a
//! fixed set of selectors. Every query is optional: no match leaves the field
//! unset. Images found in the gallery are fetched through the same cache and
//! inlined as base64; an image that cannot be fetched never fails the record.

use crate::cache::{ByteCache, CacheKey};
use crate::crawler::fetcher::ResourceFetcher;
use crate::crawler::parser::{decode_page, resolve_link};
use crate::record::{field_for_label, Field, Record};
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

const NAME_SELECTOR: &str = "h1";
const SUMMARY_SELECTOR: &str = "p.summary";
const GALLERY_IMAGE_SELECTOR: &str = "div.lightbox-content > img[src]";
const DESCRIPTION_ROW_SELECTOR: &str = "table.wanted-person-description > tbody > tr";
const CELL_SELECTOR: &str = "td";
const REWARD_SELECTOR: &str = "div.wanted-person-reward > p";
const DETAILS_SELECTOR: &str = "div.wanted-person-details > p";
const FIELD_OFFICE_SELECTOR: &str = "span.field-office > p";

/// Gallery slots: (url field, inline data field)
const IMAGE_SLOTS: [(Field, Field); 2] = [
    (Field::PicUrl, Field::PicBase64),
    (Field::AdditionalPicUrl, Field::AdditionalPicBase64),
];

/// An image reference found on the page, not yet fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    /// Field receiving the base64 data
    pub data_field: Field,

    /// Absolute URL to fetch
    pub fetch_url: String,
}

/// Result of parsing a detail page, before images are resolved
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub record: Record,
    pub images: Vec<PendingImage>,
}

/// Image fetch counters for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub encoded: u64,
    pub failed: u64,
}

/// Extracts records from detail pages
#[derive(Debug)]
pub struct EntryExtractor<'a> {
    fetcher: &'a ResourceFetcher,
    cache: &'a ByteCache,
    images_encoded: AtomicU64,
    images_failed: AtomicU64,
}

impl<'a> EntryExtractor<'a> {
    pub fn new(fetcher: &'a ResourceFetcher, cache: &'a ByteCache) -> Self {
        Self {
            fetcher,
            cache,
            images_encoded: AtomicU64::new(0),
            images_failed: AtomicU64::new(0),
        }
    }

    /// Fetches (through the cache) and extracts one detail page
    ///
    /// # Returns
    ///
    /// * `Ok(Record)` - The extracted record; `Source` is always `url`
    /// * `Err(HarvestError)` - The page could not be fetched or decoded
    pub async fn extract(&self, url: &str) -> Result<Record> {
        let key = CacheKey::for_identifier(url);
        let bytes = self
            .cache
            .fetch_cached(&key, || self.fetcher.get(url))
            .await?;
        let html = decode_page(url, &bytes)?;

        let ParsedEntry { mut record, images } = parse_entry(html, url);
        for image in images {
            self.attach_image(&mut record, &image).await;
        }

        Ok(record)
    }

    pub fn image_stats(&self) -> ImageStats {
        ImageStats {
            encoded: self.images_encoded.load(Ordering::Relaxed),
            failed: self.images_failed.load(Ordering::Relaxed),
        }
    }

    async fn attach_image(&self, record: &mut Record, image: &PendingImage) {
        let key = CacheKey::for_identifier(&image.fetch_url);
        match self
            .cache
            .fetch_cached(&key, || self.fetcher.get(&image.fetch_url))
            .await
        {
            Ok(bytes) => {
                record.set(image.data_field, STANDARD.encode(&bytes));
                self.images_encoded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::warn!("Image {} unavailable: {}", image.fetch_url, e);
                self.images_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Applies the field-extraction rules to a detail page
///
/// # Field Rules
///
/// | Field | Source |
/// |-------|--------|
/// | Name | first `h1` |
/// | DateOfCase / PlaceOfCase | `p.summary`, split at the first `<br>` |
/// | PicUrl / AdditionalPicUrl | first two `div.lightbox-content > img` sources |
/// | Description fields | two-cell rows of `table.wanted-person-description` |
/// | Reward | `div.wanted-person-reward > p` |
/// | Details | `div.wanted-person-details > p` |
/// | FieldOffice | `span.field-office > p` |
/// | Source | `page_url`, always |
/// | Id | always empty |
pub fn parse_entry(html: &str, page_url: &str) -> ParsedEntry {
    let document = Html::parse_document(html);
    let base_url = Url::parse(page_url).ok();
    let mut record = Record::for_source(page_url);

    if let Some(name) = first_text(&document, NAME_SELECTOR) {
        record.set(Field::Name, name);
    }

    if let Some(summary) = first_element(&document, SUMMARY_SELECTOR) {
        let (date, place) = split_summary(summary);
        record.set(Field::DateOfCase, date);
        if let Some(place) = place {
            record.set(Field::PlaceOfCase, place);
        }
    }

    let mut images = Vec::new();
    if let Ok(selector) = Selector::parse(GALLERY_IMAGE_SELECTOR) {
        let sources = document
            .select(&selector)
            .filter_map(|img| img.value().attr("src"));

        for ((url_field, data_field), src) in IMAGE_SLOTS.into_iter().zip(sources) {
            record.set(url_field, src);
            let fetch_url = match &base_url {
                Some(base) => resolve_link(src, base),
                None => src.trim().to_string(),
            };
            images.push(PendingImage {
                data_field,
                fetch_url,
            });
        }
    }

    extract_description(&document, &mut record);

    for (css, field) in [
        (REWARD_SELECTOR, Field::Reward),
        (DETAILS_SELECTOR, Field::Details),
        (FIELD_OFFICE_SELECTOR, Field::FieldOffice),
    ] {
        if let Some(text) = first_text(&document, css) {
            record.set(field, text);
        }
    }

    ParsedEntry { record, images }
}

/// Copies labelled description rows into the record
fn extract_description(document: &Html, record: &mut Record) {
    let (Ok(row_selector), Ok(cell_selector)) = (
        Selector::parse(DESCRIPTION_ROW_SELECTOR),
        Selector::parse(CELL_SELECTOR),
    ) else {
        return;
    };

    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() != 2 {
            continue;
        }

        let label = element_text(cells[0]);
        match field_for_label(&label) {
            Some(field) => record.set(field, element_text(cells[1])),
            None => tracing::trace!("Ignoring description label '{}'", label),
        }
    }
}

/// Splits summary content at its first `<br>`
///
/// Later `<br>` elements become newlines in the second part. The second part
/// is `None` when there is no `<br>` or nothing follows it.
fn split_summary(summary: ElementRef) -> (String, Option<String>) {
    let mut parts = vec![String::new()];

    for child in summary.children() {
        match child.value() {
            Node::Element(element) if element.name() == "br" => parts.push(String::new()),
            Node::Text(text) => {
                if let Some(current) = parts.last_mut() {
                    current.push_str(text);
                }
            }
            Node::Element(_) => {
                if let (Some(nested), Some(current)) = (ElementRef::wrap(child), parts.last_mut())
                {
                    current.extend(nested.text());
                }
            }
            _ => {}
        }
    }

    let mut parts = parts.into_iter();
    let first = parts.next().unwrap_or_default().trim().to_string();
    let rest = parts
        .map(|part| part.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let rest = rest.trim();

    let second = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };
    (first, second)
}

fn first_element<'d>(document: &'d Html, css: &str) -> Option<ElementRef<'d>> {
    let selector = Selector::parse(css).ok()?;
    let element = document.select(&selector).next();
    element
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    first_element(document, css).map(element_text)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
