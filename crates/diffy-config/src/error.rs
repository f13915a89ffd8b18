//! Error types for configuration loading

use diffy_client::ClientError;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that stop diffy before it serves any traffic
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A backend address was given neither as a flag nor in the environment
    #[error("missing {name} address (use --{name} or the diffy.{name} environment variable)")]
    MissingBackend { name: &'static str },

    /// A backend address could not be used
    #[error("invalid {name} address: {source}")]
    InvalidBackend {
        name: &'static str,
        #[source]
        source: ClientError,
    },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
