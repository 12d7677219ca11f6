//! crates/sv_io/src/lib.rs
//! I/O crate for the seat engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Election bundle loading (`loader`), canonical JSON (`canonical_json`) and
//!   SHA-256 run keys (`hasher`).
//! - No computation lives here; the pipeline owns the math.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for sv_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, …).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON parse / serialize errors with the position serde_json reports.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Bundle contents that parse but break an invariant.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        let pointer = if e.line() > 0 { format!("line {} column {}", e.line(), e.column()) } else { "/".to_string() };
        IoError::Json { pointer, msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub use loader::{load_bundle, ElectionBundle};
