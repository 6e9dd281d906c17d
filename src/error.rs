use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the AniList GraphQL endpoint
#[derive(Error, Debug)]
pub enum GraphQlError {
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from {endpoint} (HTTP {status}): {source}")]
    InvalidResponse {
        endpoint: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request variables: {0}")]
    EncodeVariables(#[from] serde_json::Error),

    #[error("AniList rejected the request: {0}")]
    Remote(String),

    #[error("AniList response contained no data")]
    MissingData,
}

/// Errors that can occur when loading episode or metadata JSON files
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
