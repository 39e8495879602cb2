//! Listing harvester - walks the paginated listing
//!
//! Listing pages are always fetched live (never from the blob cache). Page
//! one is mandatory: if it cannot be fetched or decoded the harvest fails.
//! Any later failure ends the walk and keeps what was already collected.

use crate::crawler::fetcher::ResourceFetcher;
use crate::crawler::parser::{decode_page, parse_listing, ListingPage};
use crate::Result;
use std::collections::HashSet;
use url::Url;

/// Harvest progress, one state per step of the page loop
#[derive(Debug, Clone, PartialEq, Eq)]
enum HarvestState {
    FetchPage(String),
    Done,
}

/// Result of one walk over the listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Detail URLs in encounter order, duplicates kept
    pub urls: Vec<String>,

    /// False when a later listing page failed and the walk stopped early
    pub complete: bool,
}

/// Collects detail-page URLs across all listing pages
#[derive(Debug, Clone)]
pub struct ListingHarvester<'a> {
    fetcher: &'a ResourceFetcher,
}

impl<'a> ListingHarvester<'a> {
    pub fn new(fetcher: &'a ResourceFetcher) -> Self {
        Self { fetcher }
    }

    /// Harvests every detail URL reachable from `start_url`
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestOutcome)` - Collected URLs, and whether every page loaded
    /// * `Err(HarvestError)` - The first page could not be fetched or decoded
    pub async fn harvest(&self, start_url: &str) -> Result<HarvestOutcome> {
        let mut urls = Vec::new();
        let mut complete = true;
        let mut visited = HashSet::new();
        let mut pages = 0usize;
        let mut state = HarvestState::FetchPage(start_url.to_string());

        while let HarvestState::FetchPage(page_url) = state {
            let page = match self.fetch_listing_page(&page_url).await {
                Ok(page) => page,
                Err(e) if pages == 0 => {
                    tracing::error!("Cannot load first listing page {}: {}", page_url, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        "Stopping at listing page {} ({}), keeping {} URLs: {}",
                        pages + 1,
                        page_url,
                        urls.len(),
                        e
                    );
                    complete = false;
                    break;
                }
            };

            pages += 1;
            tracing::debug!(
                "Listing page {} ({}): {} links",
                pages,
                page_url,
                page.detail_urls.len()
            );
            urls.extend(page.detail_urls);
            visited.insert(page_url);

            state = match page.next_page {
                Some(next) if visited.contains(&next) => {
                    tracing::warn!("Next page {} already visited, stopping", next);
                    HarvestState::Done
                }
                Some(next) => HarvestState::FetchPage(next),
                None => HarvestState::Done,
            };
        }

        tracing::info!("Harvested {} URLs from {} listing pages", urls.len(), pages);
        Ok(HarvestOutcome { urls, complete })
    }

    async fn fetch_listing_page(&self, page_url: &str) -> Result<ListingPage> {
        let base_url = Url::parse(page_url)?;
        let bytes = self.fetcher.get(page_url).await?;
        let html = decode_page(page_url, &bytes)?;
        Ok(parse_listing(html, &base_url))
    }
}
