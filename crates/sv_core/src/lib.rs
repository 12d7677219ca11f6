//! sv_core: Core types, method domains, ordering helpers and result records.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! engine (`sv_algo`, `sv_pipeline`, `sv_io`, `sv_cli`).
//!
//! - Name tokens: `PartyCode`, `DistrictId`
//! - Input records: `Election`, `District`, `Votes`, `Metrics`, `Parameters`
//! - Method domains: `AlgorithmType`, `Method`, `QuotaKind`, `FirstDivisor`,
//!   `Threshold`, `DisproportionalityIndex`, `SeatLaw`
//! - Output records: `PartyResult`, `DistrictResult`, `SeatResult`,
//!   `LevelingSeat`, `DistrictQuotients`, `LagueDhontResult`
//! - Deterministic ordering helpers (the tie rule lives in one place)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, PartialEq)]
    pub enum CoreError {
        InvalidName,
        InvalidFirstDivisor(f64),
        InvalidThreshold(f64),
        InvalidAreaFactor(f64),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidName => write!(f, "invalid name"),
                CoreError::InvalidFirstDivisor(v) => {
                    write!(f, "first divisor {v} outside 1.0..=3.0")
                }
                CoreError::InvalidThreshold(v) => write!(f, "threshold {v}% outside 0..=100"),
                CoreError::InvalidAreaFactor(v) => write!(f, "area factor {v} must be finite and >= 0"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod results;
pub mod variables;

pub use errors::CoreError;
pub use ids::{DistrictId, PartyCode};
