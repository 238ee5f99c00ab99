//! Error types for the file-backed stores (settings, best scores).
//!
//! The simulation itself has no failure modes; only the I/O edges return errors.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
