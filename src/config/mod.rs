//! Configuration module for pagemill
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use pagemill::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Admission gate: {}", config.pipeline.max_in_flight);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DatabaseConfig, ExtractConfig, FetchConfig, PipelineConfig, ServerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
