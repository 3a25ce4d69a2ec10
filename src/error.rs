use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("connection failed: {0}")]
    Connection(#[source] mongodb::error::Error),

    #[error("could not read catalog of '{namespace}': {source}")]
    Catalog {
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
