//! Process-pool strategy
//!
//! The batch is partitioned near-evenly across `min(CPU count, batch size)`
//! child processes. Each child is this same binary re-invoked with the
//! hidden `worker` subcommand, receives its URL chunk on stdin, and opens
//! its own store connection. Nothing is shared between workers; results are
//! visible only through the store's durable writes. A non-zero child exit
//! aborts the batch with the child's stderr as the failure detail.

use crate::config::{Config, FetchConfig};
use crate::pipeline::{build_http_client, process_url, ExtractRules};
use crate::storage::CategoryStore;
use crate::strategy::RunReport;
use crate::{MillError, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Options for one worker child, mirroring the `worker` subcommand flags
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub database: PathBuf,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub name_selector: String,
    pub description_selector: String,
}

/// Runs the batch across a pool of isolated worker processes
pub fn run_process(config: &Config, urls: Vec<String>) -> Result<RunReport> {
    let batch_size = urls.len();
    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let worker_count = cpu_count.min(batch_size).max(1);

    let chunks = partition(urls, worker_count);
    let exe = worker_binary()?;

    let start = Instant::now();

    let mut children = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let mut child = Command::new(&exe)
            .arg("worker")
            .arg("--database")
            .arg(&config.database.path)
            .arg("--timeout-secs")
            .arg(config.fetch.timeout_secs.to_string())
            .arg("--connect-timeout-secs")
            .arg(config.fetch.connect_timeout_secs.to_string())
            .arg("--user-agent")
            .arg(&config.fetch.user_agent)
            .arg("--name-selector")
            .arg(&config.extract.name_selector)
            .arg("--description-selector")
            .arg(&config.extract.description_selector)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MillError::Task("worker stdin unavailable".to_string()))?;
        for url in &chunk {
            writeln!(stdin, "{}", url)?;
        }
        drop(stdin);

        children.push(child);
    }

    // Every child is waited on before any failure is reported, so the
    // strategy never returns while a worker process is still running.
    let mut failure: Option<String> = None;
    for child in children {
        let output = child.wait_with_output()?;
        if !output.status.success() && failure.is_none() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            failure = Some(
                stderr
                    .lines()
                    .rev()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or("worker exited with failure")
                    .to_string(),
            );
        }
    }
    if let Some(detail) = failure {
        return Err(MillError::Worker { detail });
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        saved: batch_size,
    })
}

/// Entry point for the hidden `worker` subcommand
///
/// Reads URLs from stdin, one per line, and drives the pipeline over them
/// sequentially with a single connection. Any failure propagates to the
/// parent through the exit status.
pub async fn run_worker(options: WorkerOptions) -> Result<()> {
    let fetch = FetchConfig {
        timeout_secs: options.timeout_secs,
        connect_timeout_secs: options.connect_timeout_secs,
        user_agent: options.user_agent.clone(),
    };
    let client = build_http_client(&fetch)?;
    let store = CategoryStore::open(&options.database)?;
    let rules = ExtractRules::new(&options.name_selector, &options.description_selector)?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        let category = process_url(&client, &store, &rules, url).await?;
        tracing::debug!("worker stored '{}' from {}", category.name, url);
    }

    Ok(())
}

/// Resolves the worker executable: this binary, unless overridden
///
/// `PAGEMILL_WORKER_BIN` lets tests point at the real binary when the
/// current executable is a test harness.
fn worker_binary() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("PAGEMILL_WORKER_BIN") {
        return Ok(PathBuf::from(path));
    }
    Ok(std::env::current_exe()?)
}

/// Splits `urls` into `parts` near-even contiguous chunks
fn partition(urls: Vec<String>, parts: usize) -> Vec<Vec<String>> {
    let step = urls.len() / parts;
    let extra = urls.len() % parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut iter = urls.into_iter();
    for i in 0..parts {
        let size = step + usize::from(i < extra);
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/{}", i)).collect()
    }

    #[test]
    fn test_partition_even() {
        let chunks = partition(urls(6), 3);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_partition_uneven() {
        let chunks = partition(urls(10), 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn test_partition_preserves_order_and_content() {
        let input = urls(5);
        let chunks = partition(input.clone(), 2);
        let flattened: Vec<String> = chunks.into_iter().flatten().collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_partition_one_per_worker() {
        let chunks = partition(urls(3), 3);
        assert!(chunks.iter().all(|c| c.len() == 1));
    }
}
