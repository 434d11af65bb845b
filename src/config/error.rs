/// Error types for configuration module
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or deserialize the layered configuration
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Configuration file not found
    #[error("Configuration file not found at: {0}")]
    FileNotFound(String),

    /// Invalid configuration structure
    #[error("Invalid configuration structure: {0}")]
    InvalidStructure(String),

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
