//! Submit/poll job queue facade
//!
//! Wraps a concurrency strategy behind an asynchronous job protocol:
//! `submit` validates the batch, registers a job, schedules execution on
//! the runtime, and returns the id without blocking; `poll` is a pure
//! lookup of the job's current state. A job transitions
//! Pending → Running → {Succeeded, Failed} exactly once and is immutable
//! after reaching a terminal state.

use crate::config::Config;
use crate::storage::StorePool;
use crate::strategy::{self, StrategyKind};
use crate::{MillError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Lifecycle state of a submitted job
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded { elapsed_sec: f64, saved: usize },
    Failed { error: String },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded { .. } | JobState::Failed { .. })
    }
}

/// A tracked job
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: Uuid,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a job needs to execute its batch
#[derive(Clone)]
pub struct ExecutionContext {
    pub config: Arc<Config>,
    pub pool: StorePool,
    pub strategy: StrategyKind,
}

/// In-memory job registry with out-of-band execution
#[derive(Clone, Default)]
pub struct JobQueue {
    jobs: Arc<RwLock<HashMap<Uuid, JobRecord>>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a batch, then schedules execution
    ///
    /// Returns the job id immediately; an empty batch is rejected before
    /// any job exists. Submission latency is independent of batch size.
    pub fn submit(&self, ctx: ExecutionContext, urls: Vec<String>) -> Result<Uuid> {
        if urls.is_empty() {
            return Err(MillError::EmptyBatch);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        self.jobs.write().unwrap().insert(
            id,
            JobRecord {
                id,
                state: JobState::Pending,
                created_at: now,
                updated_at: now,
            },
        );

        let queue = self.clone();
        tokio::spawn(async move {
            queue.transition(id, JobState::Running);
            match strategy::run(ctx.strategy, ctx.config, ctx.pool, urls).await {
                Ok(report) => queue.transition(
                    id,
                    JobState::Succeeded {
                        elapsed_sec: report.elapsed.as_secs_f64(),
                        saved: report.saved,
                    },
                ),
                Err(e) => {
                    tracing::warn!("job {} failed: {}", id, e);
                    queue.transition(
                        id,
                        JobState::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        });

        tracing::info!("job {} queued", id);
        Ok(id)
    }

    /// Looks up the current state of a job
    ///
    /// An id the queue never issued is an error, never a pending state.
    pub fn poll(&self, id: Uuid) -> Result<JobRecord> {
        self.jobs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| MillError::JobNotFound { id: id.to_string() })
    }

    /// Applies a state transition; terminal states are never overwritten
    fn transition(&self, id: Uuid, next: JobState) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(record) = jobs.get_mut(&id) {
            if record.state.is_terminal() {
                tracing::warn!("ignoring transition for finished job {}", id);
                return;
            }
            record.state = next;
            record.updated_at = Utc::now();
        }
    }
}
