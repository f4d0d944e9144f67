//! Unified error types for the bridge builder

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for network and endpoint operations
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // Request validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("HNS is older than the minimum supported version {minimum} (running {current})")]
    UnsupportedVersion { minimum: String, current: String },

    // Lookup errors
    #[error("HNS network '{0}' not found")]
    NetworkNotFound(String),

    #[error("HNS endpoint '{0}' not found")]
    EndpointNotFound(String),

    // Control service errors
    #[error("HNS {operation} failed for '{resource}': {message}")]
    Hns {
        operation: String,
        resource: String,
        message: String,
    },

    #[error("Compute system '{0}' does not exist")]
    ComputeSystemNotFound(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("HNS endpoint '{endpoint}' reported invalid MAC address '{value}'")]
    InvalidEndpointMac { endpoint: String, value: String },

    #[error("Endpoint '{endpoint}' cannot handle '{event}' in state {state}")]
    InvalidTransition {
        endpoint: String,
        event: String,
        state: String,
    },

    #[error("Failed to encode HNS request: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a control service failure for the given operation and resource
    pub fn hns(
        operation: impl Into<String>,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Hns {
            operation: operation.into(),
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for bridge builder operations
pub type Result<T> = std::result::Result<T, Error>;
