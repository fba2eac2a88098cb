//! Thread-pool strategy
//!
//! A fixed pool of OS threads pulls URLs from a shared queue until it
//! drains. Workers share process memory but nothing else: each owns its
//! blocking HTTP client and its own store connection. The first failure
//! raises an abort flag so the other workers stop picking up new URLs, and
//! the error propagates once every thread has joined.

use crate::config::Config;
use crate::pipeline::{build_blocking_client, process_url_blocking, ExtractRules};
use crate::storage::CategoryStore;
use crate::strategy::RunReport;
use crate::{MillError, Result};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Runs the batch on a pool of `min(thread-workers, batch size)` threads
pub fn run_threaded(config: &Config, urls: Vec<String>) -> Result<RunReport> {
    let batch_size = urls.len();
    let worker_count = (config.pipeline.thread_workers as usize).min(batch_size).max(1);

    let queue = Arc::new(Mutex::new(VecDeque::from(urls)));
    let abort = Arc::new(AtomicBool::new(false));
    let db_path = PathBuf::from(&config.database.path);

    let start = Instant::now();

    let mut handles = Vec::with_capacity(worker_count);
    for worker in 0..worker_count {
        let queue = Arc::clone(&queue);
        let abort = Arc::clone(&abort);
        let fetch = config.fetch.clone();
        let extract = config.extract.clone();
        let db_path = db_path.clone();

        handles.push(thread::spawn(move || -> Result<usize> {
            let client = build_blocking_client(&fetch)?;
            let store = CategoryStore::open(&db_path)?;
            let rules = ExtractRules::from_config(&extract)?;

            let mut processed = 0usize;
            loop {
                if abort.load(Ordering::Relaxed) {
                    break;
                }

                let next = queue.lock().unwrap().pop_front();
                let Some(url) = next else { break };

                match process_url_blocking(&client, &store, &rules, &url) {
                    Ok(category) => {
                        tracing::debug!("worker {} stored '{}' from {}", worker, category.name, url);
                        processed += 1;
                    }
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            Ok(processed)
        }));
    }

    let mut first_error: Option<MillError> = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(_) => {
                if first_error.is_none() {
                    first_error = Some(MillError::Task("worker thread panicked".to_string()));
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    Ok(RunReport {
        elapsed: start.elapsed(),
        saved: batch_size,
    })
}
