use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalogue read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalogue parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown database key: {0}")]
    UnknownDatabase(String),
}
