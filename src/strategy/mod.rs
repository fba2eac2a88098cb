//! Concurrency strategies for driving the pipeline
//!
//! Three interchangeable implementations run the same fetch → extract →
//! store sequencing over a URL batch, differing only in how parallelism and
//! isolation are achieved:
//!
//! - [`StrategyKind::Threaded`]: a fixed pool of OS threads draining a
//!   shared queue, blocking I/O, one store connection per worker
//! - [`StrategyKind::Process`]: the batch partitioned across isolated child
//!   processes, results visible only through the store's durable writes
//! - [`StrategyKind::BoundedAsync`]: a cooperative scheduler with a counting
//!   admission gate and a shared bounded connection pool
//!
//! None of them guarantee processing order; all of them fail fast on the
//! first error with no retries.

mod bounded;
mod process;
mod threaded;

pub use bounded::run_bounded;
pub use process::{run_process, run_worker, WorkerOptions};
pub use threaded::run_threaded;

use crate::config::Config;
use crate::storage::StorePool;
use crate::{MillError, Result};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Selects one of the three strategy implementations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Threaded,
    Process,
    #[default]
    BoundedAsync,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyKind::Threaded => "threaded",
            StrategyKind::Process => "process",
            StrategyKind::BoundedAsync => "bounded-async",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of one strategy run over a batch
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    /// Wall time from strategy launch until all work completed
    pub elapsed: Duration,
    /// Batch size; with the all-or-fail policy a successful run covered
    /// every URL
    pub saved: usize,
}

/// Runs a URL batch through the pipeline under the chosen strategy
///
/// An empty batch is rejected up front. The blocking strategies are moved
/// off the async runtime onto a blocking thread.
pub async fn run(
    kind: StrategyKind,
    config: Arc<Config>,
    pool: StorePool,
    urls: Vec<String>,
) -> Result<RunReport> {
    if urls.is_empty() {
        return Err(MillError::EmptyBatch);
    }

    tracing::info!("running {} strategy over {} URLs", kind, urls.len());

    match kind {
        StrategyKind::Threaded => {
            tokio::task::spawn_blocking(move || run_threaded(&config, urls))
                .await
                .map_err(|e| MillError::Task(format!("threaded strategy aborted: {}", e)))?
        }
        StrategyKind::Process => {
            tokio::task::spawn_blocking(move || run_process(&config, urls))
                .await
                .map_err(|e| MillError::Task(format!("process strategy aborted: {}", e)))?
        }
        StrategyKind::BoundedAsync => run_bounded(&config, &pool, urls).await,
    }
}
