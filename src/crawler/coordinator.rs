//! Harvest coordinator - main run orchestration logic
//!
//! This module drives one complete run:
//! - Validating configuration before any network activity
//! - Loading the cached URL list, or harvesting the listing
//! - Extracting each detail page in discovery order
//! - Exporting the records and collecting run statistics

use crate::cache::{open_cache, ByteCache, UrlListCache};
use crate::config::{resolve_columns, validate, Config};
use crate::crawler::extractor::EntryExtractor;
use crate::crawler::fetcher::ResourceFetcher;
use crate::crawler::harvester::ListingHarvester;
use crate::output::{write_csv_file, RunStatistics, UrlSource};
use crate::record::{Field, Record};
use crate::{HarvestError, Result};
use chrono::Utc;
use std::path::Path;

/// Main harvest coordinator structure
#[derive(Debug)]
pub struct Coordinator {
    config: Config,
    columns: Vec<Field>,
    fetcher: ResourceFetcher,
    cache: ByteCache,
    url_list: Option<UrlListCache>,
    fresh: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `fresh` - Ignore a cached URL list and harvest the listing again
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid configuration or unusable cache directory
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        validate(&config)?;
        let columns = resolve_columns(config.output.columns.as_ref())?;

        let fetcher = ResourceFetcher::new(&config.http)?;
        let cache = open_cache(&config.cache.cache_dir)?;
        let url_list = UrlListCache::for_dir(&config.cache.cache_dir);

        Ok(Self {
            config,
            columns,
            fetcher,
            cache,
            url_list,
            fresh,
        })
    }

    /// Runs the whole pipeline
    ///
    /// 1. Gets the detail URL list (cached or harvested)
    /// 2. Extracts every entry, skipping failures
    /// 3. Exports all extracted records
    ///
    /// # Returns
    ///
    /// * `Ok(RunStatistics)` - The run completed and the table was written
    /// * `Err(HarvestError)` - The listing could not be harvested, it was
    ///   empty, or the table could not be written
    pub async fn run(&self) -> Result<RunStatistics> {
        let mut stats = RunStatistics::new(Utc::now());

        let (urls, url_source) = self.load_or_harvest().await?;
        if urls.is_empty() {
            tracing::error!("No entries for scan");
            return Err(HarvestError::NoEntries);
        }
        stats.urls_total = urls.len();
        stats.url_source = url_source;
        tracing::info!("Total items found: {}", urls.len());

        let extractor = EntryExtractor::new(&self.fetcher, &self.cache);
        let records = self.extract_all(&extractor, &urls, &mut stats).await;

        write_csv_file(
            Path::new(&self.config.output.output_path),
            &self.columns,
            &records,
        )?;

        stats.images = extractor.image_stats();
        stats.cache = self.cache.stats();
        stats.finished_at = Some(Utc::now());

        tracing::info!(
            "Run complete: {} records, {} entries failed",
            stats.records_extracted,
            stats.entries_failed
        );
        Ok(stats)
    }

    async fn load_or_harvest(&self) -> Result<(Vec<String>, UrlSource)> {
        if let Some(url_list) = &self.url_list {
            if self.fresh {
                tracing::info!("Fresh run, ignoring {}", url_list.path().display());
            } else {
                match url_list.load() {
                    Ok(Some(urls)) if !urls.is_empty() => {
                        tracing::info!(
                            "Loaded {} URLs from {}",
                            urls.len(),
                            url_list.path().display()
                        );
                        return Ok((urls, UrlSource::Cached));
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Ignoring unreadable URL list: {}", e),
                }
            }
        }

        let harvester = ListingHarvester::new(&self.fetcher);
        let outcome = harvester.harvest(&self.config.source.start_url).await?;

        if let Some(url_list) = &self.url_list {
            if !outcome.complete {
                tracing::warn!(
                    "Listing harvest stopped early, not caching {} URLs",
                    outcome.urls.len()
                );
            } else if let Err(e) = url_list.save(&outcome.urls) {
                tracing::warn!("Failed to cache URL list: {}", e);
            }
        }

        Ok((outcome.urls, UrlSource::Harvested))
    }

    async fn extract_all(
        &self,
        extractor: &EntryExtractor<'_>,
        urls: &[String],
        stats: &mut RunStatistics,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            tracing::debug!("Downloading [{}/{}]: {}", index + 1, urls.len(), url);

            match extractor.extract(url).await {
                Ok(record) => {
                    records.push(record);
                    stats.records_extracted += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping entry {}: {}", url, e);
                    stats.entries_failed += 1;
                }
            }

            if (index + 1) % 10 == 0 {
                tracing::info!("Progress: {}/{} entries processed", index + 1, urls.len());
            }
        }

        records
    }
}

/// Runs a complete harvest with a freshly built coordinator
pub async fn run_harvest(config: Config, fresh: bool) -> Result<RunStatistics> {
    Coordinator::new(config, fresh)?.run().await
}
