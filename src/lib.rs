//! Pagemill: a category-page harvesting pipeline
//!
//! This crate fetches category pages, extracts a `(name, description)` pair
//! from each, and upserts the result into a deduplicating SQLite store. The
//! pipeline runs under one of three interchangeable concurrency strategies
//! (thread pool, process pool, bounded async) so their throughput can be
//! compared on the same workload, and is fronted by an HTTP API with an
//! asynchronous submit/poll job queue.

pub mod bench;
pub mod config;
pub mod jobs;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod strategy;

use thiserror::Error;

/// Main error type for pagemill operations
#[derive(Debug, Error)]
pub enum MillError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Empty URL batch")]
    EmptyBatch,

    #[error("Unknown job: {id}")]
    JobNotFound { id: String },

    #[error("Worker process failed: {detail}")]
    Worker { detail: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Address error: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),
}

/// Result type alias for pagemill operations
pub type Result<T, E = MillError> = std::result::Result<T, E>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use jobs::{JobQueue, JobState};
pub use pipeline::{extract_category, Category, ExtractRules};
pub use storage::{CategoryStore, StorePool};
pub use strategy::{RunReport, StrategyKind};
