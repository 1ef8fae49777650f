//! Error types shared across the crate
//!
//! Domain errors use `thiserror`; CLI handlers wrap them in `anyhow` at the
//! boundary. The API layer maps these onto HTTP status codes in `api::error`.

use thiserror::Error;

/// Errors produced by the dataset, predictor, and network components
#[derive(Error, Debug)]
pub enum PowerverseError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Graph is empty. Build a network first.")]
    EmptyGraph,

    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PowerverseError>;
