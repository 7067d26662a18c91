//! Error types for the site API client.

/// Errors returned by the site API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Server returned an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the server (429).
    #[error("rate limited")]
    RateLimited,

    /// Response body is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but failed validation.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(err)
        }
    }
}
