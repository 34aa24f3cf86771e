use flickstash_db::{IngestError, SchemaError, StoreError};
use flickstash_xtream::FetchError;

/// Errors from the orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No provider client configured; cannot sync")]
    NoClient,

    #[error("Favorites file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Favorites file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
