//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the harvester, including:
//! - Building the HTTP client with the configured browser user agent
//! - GET and POST requests with optional body and extra headers
//! - Classifying transport failures and error statuses
//!
//! There is no retry here. Errors carry [`HarvestError::is_retryable`] so a
//! caller can layer a retry policy on top.

use crate::config::HttpConfig;
use crate::{HarvestError, Result};
use reqwest::{Client, Method};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// HTTP methods the fetcher accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMethod {
    #[default]
    Get,
    Post,
}

impl FetchMethod {
    fn as_reqwest(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

impl FromStr for FetchMethod {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(HarvestError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use wanted_harvest::config::HttpConfig;
/// use wanted_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Retrieves resources over HTTP
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: Client,
    accept_error_status: bool,
}

impl ResourceFetcher {
    /// Creates a fetcher from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            accept_error_status: config.accept_error_status,
        })
    }

    /// Fetches a URL and returns the raw response body
    ///
    /// # Request Flow
    ///
    /// 1. Build the request with `method`, optional `body` and `headers`
    /// 2. Send it; a transport failure → `HarvestError::Http`
    /// 3. Non-2xx status → `HarvestError::HttpStatus`, unless
    ///    `accept-error-status` is set, in which case the body is returned
    /// 4. Read the body; a read failure → `HarvestError::Http`
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `method` - GET or POST
    /// * `body` - Request body, if any
    /// * `headers` - Extra request headers
    pub async fn fetch(
        &self,
        url: &str,
        method: FetchMethod,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        tracing::trace!("{} {}", method, url);

        let mut request = self.client.request(method.as_reqwest(), url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                tracing::debug!("Request timeout for {}", url);
            } else if source.is_connect() {
                tracing::debug!("Connection failed for {}", url);
            }
            HarvestError::Http {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            if self.accept_error_status {
                tracing::debug!("Accepting HTTP {} body for {}", status.as_u16(), url);
            } else {
                return Err(HarvestError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
        }

        let bytes = response.bytes().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(bytes.to_vec())
    }

    /// Plain GET with no body and no extra headers
    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch(url, FetchMethod::Get, None, &[]).await
    }
}
