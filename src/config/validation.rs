use crate::config::types::{Config, HttpConfig, OutputConfig, SourceConfig};
use crate::record::{Field, DEFAULT_COLUMNS};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network activity, so every configuration error is fatal
/// up front.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the listing entry point
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.start_url.is_empty() {
        return Err(ConfigError::Validation(
            "start_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "Output file is not specified".to_string(),
        ));
    }

    if let Some(columns) = &config.columns {
        if columns.is_empty() {
            return Err(ConfigError::Validation(
                "columns cannot be an empty list".to_string(),
            ));
        }
        resolve_columns(Some(columns))?;
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Maps configured column names to fields, defaulting to the fixed schema
pub fn resolve_columns(columns: Option<&Vec<String>>) -> Result<Vec<Field>, ConfigError> {
    match columns {
        None => Ok(DEFAULT_COLUMNS.to_vec()),
        Some(names) => names
            .iter()
            .map(|name| {
                name.parse::<Field>()
                    .map_err(ConfigError::UnknownColumn)
            })
            .collect(),
    }
}
