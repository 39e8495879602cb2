use serde::Deserialize;

/// Listing entry point used when nothing else is configured
pub const DEFAULT_START_URL: &str =
    "https://www.fbi.gov/wanted/kidnap/@@castle.cms.querylisting/querylisting-1";

/// Desktop browser identification sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:76.0) Gecko/20100101 Firefox/76.0";

pub const DEFAULT_OUTPUT_PATH: &str = "output/output.csv";

pub const DEFAULT_CACHE_DIR: &str = "output/cache";

/// Main configuration structure for Wanted-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

/// Where harvesting starts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// First listing page
    #[serde(rename = "start-url")]
    pub start_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the exported CSV file
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Exported column names, in order; the fixed schema when absent
    pub columns: Option<Vec<String>>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            columns: None,
        }
    }
}

/// Blob cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory for cached pages, images and the URL list; empty disables
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds; no timeout when absent
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Treat non-2xx responses as successful fetches
    #[serde(rename = "accept-error-status")]
    pub accept_error_status: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            accept_error_status: false,
        }
    }
}
