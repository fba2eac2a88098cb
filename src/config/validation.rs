use crate::config::types::{Config, DatabaseConfig, ExtractConfig, FetchConfig, PipelineConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_database_config(&config.database)?;
    validate_server_config(&config.server)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_addr.parse::<SocketAddr>().map_err(|_| {
        ConfigError::Validation(format!(
            "bind-addr must be a socket address like 127.0.0.1:8080, got '{}'",
            config.bind_addr
        ))
    })?;

    Ok(())
}

/// Validates pipeline configuration
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.max_in_flight < 1 || config.max_in_flight > 100 {
        return Err(ConfigError::Validation(format!(
            "max-in-flight must be between 1 and 100, got {}",
            config.max_in_flight
        )));
    }

    if config.thread_workers < 1 || config.thread_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "thread-workers must be between 1 and 100, got {}",
            config.thread_workers
        )));
    }

    if config.store_pool_size < 1 || config.store_pool_size > 50 {
        return Err(ConfigError::Validation(format!(
            "store-pool-size must be between 1 and 50, got {}",
            config.store_pool_size
        )));
    }

    Ok(())
}

/// Validates extraction selectors by compiling them
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    crate::pipeline::ExtractRules::from_config(config)?;
    Ok(())
}
