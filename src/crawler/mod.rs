//! Crawler module for listing harvesting and entry extraction
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with GET/POST and status classification
//! - Listing page parsing and pagination
//! - Detail page field extraction with cached images
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod harvester;
mod parser;

pub use coordinator::{run_harvest, Coordinator};
pub use extractor::{parse_entry, EntryExtractor, ImageStats, ParsedEntry, PendingImage};
pub use fetcher::{build_http_client, FetchMethod, ResourceFetcher};
pub use harvester::{HarvestOutcome, ListingHarvester};
pub use parser::{decode_page, parse_listing, resolve_link, ListingPage};

use crate::config::Config;
use crate::output::RunStatistics;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Validate the configuration
/// 2. Open the blob cache
/// 3. Load the cached URL list or harvest the listing
/// 4. Extract every detail page
/// 5. Export the records as CSV
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `fresh` - Ignore the cached URL list
///
/// # Returns
///
/// * `Ok(RunStatistics)` - Run completed
/// * `Err(HarvestError)` - Run failed
pub async fn harvest(config: Config, fresh: bool) -> Result<RunStatistics, HarvestError> {
    run_harvest(config, fresh).await
}
