//! Error handling for requests

use thiserror::Error;

/// Main error type for request building and sending
#[derive(Error, Debug)]
pub enum RequestsError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSL/TLS error: {0}")]
    Ssl(String),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Result type alias for requests operations
pub type Result<T> = std::result::Result<T, RequestsError>;
