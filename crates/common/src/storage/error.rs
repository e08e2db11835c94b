use reqwest::StatusCode;

use super::connection_string::ConnectionStringError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("blob request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("blob service returned {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("invalid blob url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid connection string: {0}")]
    ConnectionString(#[from] ConnectionStringError),
    #[error("invalid header name: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),
    #[error("account key cannot be used for signing")]
    InvalidAccountKey,
}
