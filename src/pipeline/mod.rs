//! The fetch → extract → store pipeline
//!
//! Every concurrency strategy drives the same sequencing through this
//! module: fetch one page, extract its `(name, description)` pair, and
//! conditionally insert it. The strategies differ only in how the calls are
//! scheduled, so the sequencing lives here exactly once.

mod extractor;
mod fetcher;

pub use extractor::{extract_category, Category, ExtractRules};
pub use fetcher::{build_blocking_client, build_http_client, fetch_page, fetch_page_blocking};

use crate::storage::CategoryStore;
use crate::Result;

/// Fetches one URL and persists its extracted category (async fetch path)
pub async fn process_url(
    client: &reqwest::Client,
    store: &CategoryStore,
    rules: &ExtractRules,
    url: &str,
) -> Result<Category> {
    let html = fetch_page(client, url).await?;
    store_page(store, rules, &html)
}

/// Blocking twin of [`process_url`] for thread- and process-pool workers
pub fn process_url_blocking(
    client: &reqwest::blocking::Client,
    store: &CategoryStore,
    rules: &ExtractRules,
    url: &str,
) -> Result<Category> {
    let html = fetch_page_blocking(client, url)?;
    store_page(store, rules, &html)
}

/// Extracts a category from fetched markup and upserts it into the store.
///
/// Insertion is conditional on the `name` uniqueness constraint: a duplicate
/// name leaves the store unchanged and is not an error.
pub fn store_page(store: &CategoryStore, rules: &ExtractRules, html: &str) -> Result<Category> {
    let category = extract_category(html, rules);
    store.insert_ignore(&category.name, &category.description)?;
    Ok(category)
}
