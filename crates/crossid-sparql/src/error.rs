use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request blocked: host not in allowlist for URL {0}")]
    Blocked(String),

    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("endpoint URL has no host: {0}")]
    NoHost(String),

    #[error("identifier not safe for query interpolation: {0}")]
    UnsafeIdentifier(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
