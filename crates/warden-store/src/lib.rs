//! Persistence layer for wardend
//!
//! The registry (targets plus pause records) is the single source of
//! truth and is always loaded and saved as one JSON document. Saves go
//! through a temp-file-then-rename replace so a crash mid-write can
//! never leave a truncated registry on disk.

mod json;
mod registry;

pub use json::*;
pub use registry::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
