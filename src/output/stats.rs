//! Run statistics
//!
//! Counters collected by the coordinator during one run, printed when the
//! run finishes.

use crate::cache::CacheStats;
use crate::crawler::ImageStats;
use chrono::{DateTime, Utc};

/// Where the run's URL list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Harvested,
    Cached,
}

/// Run statistics summary
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of detail URLs to process
    pub urls_total: usize,
    pub url_source: UrlSource,

    /// Records successfully extracted (and exported)
    pub records_extracted: usize,

    /// Detail pages skipped because fetch or parse failed
    pub entries_failed: usize,

    pub images: ImageStats,
    pub cache: CacheStats,
}

impl RunStatistics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            urls_total: 0,
            url_source: UrlSource::Harvested,
            records_extracted: 0,
            entries_failed: 0,
            images: ImageStats::default(),
            cache: CacheStats::default(),
        }
    }

    /// Duration of the run in whole seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of detail URLs that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.urls_total == 0 {
            return 0.0;
        }
        (self.records_extracted as f64 / self.urls_total as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Entries:");
    let source = match stats.url_source {
        UrlSource::Harvested => "harvested",
        UrlSource::Cached => "from cached list",
    };
    println!("  URLs: {} ({})", stats.urls_total, source);
    println!("  Records extracted: {}", stats.records_extracted);
    println!("  Entries failed: {}", stats.entries_failed);
    println!();

    println!("Images:");
    println!("  Encoded: {}", stats.images.encoded);
    println!("  Failed: {}", stats.images.failed);
    println!();

    println!("Cache:");
    println!("  Hits: {}", stats.cache.hits);
    println!("  Misses: {}", stats.cache.misses);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} entries extracted)",
        stats.success_rate(),
        stats.records_extracted,
        stats.urls_total
    );
}
