//! HTTP fetchers for the pipeline
//!
//! One network retrieval per URL with a client-level timeout. There is no
//! retry logic: a timeout or non-2xx response becomes a typed error carrying
//! the URL, and the owning strategy decides how far the failure propagates.
//!
//! Two client flavors share the same builder settings: the async client used
//! by the bounded-async strategy and worker children, and the blocking client
//! used by thread-pool workers.

use crate::config::FetchConfig;
use crate::{MillError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds the async HTTP client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the blocking HTTP client with the same settings
pub fn build_blocking_client(
    config: &FetchConfig,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and returns its body
///
/// # Returns
///
/// * `Ok(String)` - 2xx response body
/// * `Err(MillError::Timeout)` - the request exceeded the configured timeout
/// * `Err(MillError::HttpStatus)` - a non-2xx response
/// * `Err(MillError::Http)` - any other transport failure
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MillError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Blocking twin of [`fetch_page`]
pub fn fetch_page_blocking(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MillError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| classify_error(url, e))
}

fn classify_error(url: &str, source: reqwest::Error) -> MillError {
    if source.is_timeout() {
        MillError::Timeout {
            url: url.to_string(),
        }
    } else {
        MillError::Http {
            url: url.to_string(),
            source,
        }
    }
}
