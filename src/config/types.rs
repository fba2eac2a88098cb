use crate::strategy::StrategyKind;
use serde::Deserialize;

/// Main configuration structure for pagemill
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API server binds to
    #[serde(rename = "bind-addr", default = "default_bind_addr")]
    pub bind_addr: String,

    /// Strategy used to execute submitted jobs
    #[serde(rename = "job-strategy", default)]
    pub job_strategy: StrategyKind,
}

/// Concurrency and pooling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Admission gate: maximum in-flight fetch+store operations in the
    /// bounded-async strategy
    #[serde(rename = "max-in-flight", default = "default_max_in_flight")]
    pub max_in_flight: u32,

    /// Upper bound on worker threads in the thread-pool strategy
    #[serde(rename = "thread-workers", default = "default_thread_workers")]
    pub thread_workers: u32,

    /// Number of connections in the shared store pool
    #[serde(rename = "store-pool-size", default = "default_store_pool_size")]
    pub store_pool_size: u32,
}

/// Extraction selector configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Selector for the primary heading
    #[serde(rename = "name-selector", default = "default_name_selector")]
    pub name_selector: String,

    /// Selector for the description block
    #[serde(rename = "description-selector", default = "default_description_selector")]
    pub description_selector: String,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("pagemill/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_in_flight() -> u32 {
    10
}

fn default_thread_workers() -> u32 {
    20
}

fn default_store_pool_size() -> u32 {
    10
}

fn default_name_selector() -> String {
    "h2.okved_h2_title".to_string()
}

fn default_description_selector() -> String {
    "div.okved_desc".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            job_strategy: StrategyKind::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            thread_workers: default_thread_workers(),
            store_pool_size: default_store_pool_size(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            name_selector: default_name_selector(),
            description_selector: default_description_selector(),
        }
    }
}
