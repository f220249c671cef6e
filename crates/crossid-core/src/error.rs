use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrossidError {
    #[error("invalid pattern `{name}`: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("namespace `{name}` is not present at level {index}")]
    UnknownNamespace { name: String, index: usize },

    #[error("level index {index} out of range ({len} levels)")]
    LevelOutOfRange { index: usize, len: usize },

    #[error("stale expansion response: ticket generation {ticket}, session generation {current}")]
    StaleExpansion { ticket: u64, current: u64 },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrossidError>;
