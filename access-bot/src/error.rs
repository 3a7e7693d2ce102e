//! Error types for the backend client and startup configuration.

use thiserror::Error;

/// Failures talking to the Directus backend.
///
/// An employee that does not exist is not an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// 401: the bot's static token was rejected.
    #[error("backend rejected the access token (401 Unauthorized)")]
    Unauthorized,

    /// 403: the token is valid but lacks read permission on the collection.
    #[error("backend denied access to the requested data (403 Forbidden)")]
    Forbidden,

    /// Any other non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Network failure or timeout.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON envelope.
    #[error("invalid backend response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}
