use std::result::Result as StdResult;

use thiserror::Error;

/// Error type that captures configuration, session, and backend failures.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Role `{0}` is not allowed to manage this view")]
    Unauthorized(String),
    #[error("Session expired, sign in again")]
    SessionExpired,
}

pub type Result<T> = StdResult<T, PanelError>;
