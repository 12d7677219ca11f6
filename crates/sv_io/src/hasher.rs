//! crates/sv_io/src/hasher.rs
//!
//! Deterministic hashing for canonical artifacts and memo keys.
//!
//! - Use `sha256_canonical(..)` for JSON values/structs (goes through canonical_json).
//! - Use `sha256_hex(..)` / `sha256_file(..)` for raw bytes/files.
//! - Hex digests are lowercase.
//! - `run_key(..)` is the memo key for one computation: callers cache results by
//!   it; the engine itself stores nothing.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use sv_core::variables::AlgorithmType;

use crate::canonical_json::canonical_json_bytes;
use crate::IoError;

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&canonical_json_bytes(value)?))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let mut r = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// `<year>:<algorithm>:<sha256 of canonical parameters>`.
///
/// Two runs with the same key produce the same `LagueDhontResult`.
pub fn run_key<T: Serialize>(year: u16, algorithm: AlgorithmType, parameters: &T) -> Result<String, IoError> {
    let digest = sha256_canonical(parameters)?;
    Ok(format!("{year}:{}:{digest}", algorithm.as_token()))
}
