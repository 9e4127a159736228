use thiserror::Error;

/// Failure of the sample store, either while appending or while querying
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Database handler unavailable")]
    Unavailable,
}

impl From<duckdb::Error> for StoreError {
    fn from(e: duckdb::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// 采集链路上的错误
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        IngestError::Validation(e.to_string())
    }
}
