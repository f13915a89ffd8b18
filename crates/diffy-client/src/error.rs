//! Error types for the backend client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while setting up the client, before any traffic is served
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend address is not a valid URL
    #[error("invalid backend address '{url}': {reason}")]
    InvalidAddress { url: String, reason: String },

    /// Backend address uses a scheme other than http or https
    #[error("unsupported scheme '{scheme}' in backend address '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    /// Failed to build the HTTP client
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Why a single backend call did not produce a usable body
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection could not be established or the request could not be sent
    #[error("{0}")]
    Send(#[source] reqwest::Error),

    /// Backend answered with something other than 200 OK
    #[error("status: {}", .0.as_u16())]
    Status(StatusCode),

    /// Response body could not be read completely
    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}
