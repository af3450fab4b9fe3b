use thiserror::Error;

/// Errors from the OMDb API client.
#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Something went wrong with fetching data (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The endpoint answered `Response: "False"`.
    #[error("{0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}
