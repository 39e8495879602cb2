//! Configuration module for Wanted-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The resulting [`Config`] is built once at startup and passed into
//! each component; nothing reads configuration from global state.
//!
//! # Example
//!
//! ```no_run
//! use wanted_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Exporting to: {}", config.output.output_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, HttpConfig, OutputConfig, SourceConfig, DEFAULT_CACHE_DIR,
    DEFAULT_OUTPUT_PATH, DEFAULT_START_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, read_config};
pub use validation::{resolve_columns, validate};
