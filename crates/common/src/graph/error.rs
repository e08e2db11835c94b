use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("graph returned {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("invalid graph url: {0}")]
    Url(#[from] url::ParseError),
    #[error("document library '{0}' not found")]
    LibraryNotFound(String),
}
