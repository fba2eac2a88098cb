//! Bounded-async strategy
//!
//! Every URL becomes a task on the cooperative scheduler; a counting
//! semaphore admits at most `max-in-flight` fetch+store operations at once,
//! independent of batch size. Storage goes through the shared bounded
//! connection pool, acquired per insert and released immediately after.
//! The batch fails fast: the first task error is returned and the
//! remaining tasks are aborted when the set drops.

use crate::config::Config;
use crate::pipeline::{build_http_client, fetch_page, store_page, ExtractRules};
use crate::storage::StorePool;
use crate::strategy::RunReport;
use crate::{MillError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs the batch on the async runtime behind the admission gate
pub async fn run_bounded(config: &Config, pool: &StorePool, urls: Vec<String>) -> Result<RunReport> {
    let batch_size = urls.len();
    let client = build_http_client(&config.fetch)?;
    let rules = Arc::new(ExtractRules::from_config(&config.extract)?);
    let gate = Arc::new(Semaphore::new(config.pipeline.max_in_flight as usize));

    let start = Instant::now();

    let mut tasks: JoinSet<Result<()>> = JoinSet::new();
    for url in urls {
        let client = client.clone();
        let rules = Arc::clone(&rules);
        let gate = Arc::clone(&gate);
        let pool = pool.clone();

        tasks.spawn(async move {
            // The permit spans fetch, extraction, and the store write.
            let _permit = gate
                .acquire_owned()
                .await
                .map_err(|_| MillError::Task("admission gate closed".to_string()))?;

            let html = fetch_page(&client, &url).await?;
            let store = pool.acquire().await?;
            let category = store_page(&store, &rules, &html)?;
            tracing::debug!("stored '{}' from {}", category.name, url);
            Ok(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.map_err(|e| MillError::Task(format!("pipeline task failed: {}", e)))??;
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        saved: batch_size,
    })
}
