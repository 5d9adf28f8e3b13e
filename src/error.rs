//! Error types and result aliases for the study assistant.
//!
//! Internal layers (gateway, store, config) return [`Result`] and propagate with `?`.
//! The boundary layers turn a [`CoachError`] into a user-visible notice instead of
//! letting it escape the running session.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid save name: {0:?}")]
    InvalidSaveName(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("No file was uploaded.")]
    MissingUpload,
}

pub type Result<T> = std::result::Result<T, CoachError>;
