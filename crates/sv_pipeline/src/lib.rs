//! sv_pipeline: deterministic orchestration of one seat computation
//! (load → merge → validate → district seats → allocate → aggregate → levelling → build).
//! I/O stays in `sv_io`, the math in `sv_algo`; this crate only wires the stages.

#![forbid(unsafe_code)]

use std::path::Path;

use sv_algo::{distribute_levelling, AllocError, LevellingError};
use sv_core::entities::party_names;
use sv_core::results::LagueDhontResult;
use sv_core::CoreError;

pub mod aggregate;
pub mod allocate;
pub mod build_result;
pub mod load;
pub mod merge;
pub mod payload;
pub mod seats;
pub mod validate;

#[cfg(test)]
mod testing;

pub use load::{select_year, YearOptions};
pub use merge::{should_merge, DistrictMap, DISTRICT_MAP};
pub use payload::{ComputationPayload, RunSettings};
pub use validate::{validate, Severity, ValidationIssue, ValidationReport};

/// Single error surface of a computation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed records or settings; nothing was computed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Levelling could not place every requested seat.
    #[error("levelling seat {seat_number} of {requested} cannot be placed ({awarded} awarded)")]
    Unsatisfiable { seat_number: u32, requested: u32, awarded: u32 },

    #[error(transparent)]
    Io(#[from] sv_io::IoError),
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        EngineError::InvalidInput(e.to_string())
    }
}

impl From<AllocError> for EngineError {
    fn from(e: AllocError) -> Self {
        EngineError::InvalidInput(e.to_string())
    }
}

impl From<LevellingError> for EngineError {
    fn from(e: LevellingError) -> Self {
        match e {
            LevellingError::Unsatisfiable { seat_number, requested, awarded } => {
                EngineError::Unsatisfiable { seat_number, requested, awarded }
            }
        }
    }
}

/// Run one computation. Pure: same payload, same result.
pub fn compute(payload: &ComputationPayload) -> Result<LagueDhontResult, EngineError> {
    let report = validate(payload);
    for w in report.issues.iter().filter(|i| i.severity == Severity::Warning) {
        tracing::warn!(code = w.code, "{}", w.message);
    }
    if !report.pass {
        let msg = report.errors().map(|i| format!("{}: {}", i.code, i.message)).collect::<Vec<_>>().join("; ");
        return Err(EngineError::InvalidInput(msg));
    }

    let settings = payload.settings()?;
    let election = seats::resolve_district_seats(payload, &settings)?;

    let mut districts =
        allocate::allocate_all(&election, &payload.votes, settings.method, settings.district_threshold)?;
    let names = party_names(&payload.votes);
    aggregate::attach_names(&mut districts, &names);
    let national = aggregate::national_results(&districts, &names);

    let outcome = distribute_levelling(
        &national,
        &districts,
        settings.leveling_seats,
        settings.election_threshold,
        settings.levelling_divisor,
    )?;
    let result = build_result::build_result(districts, outcome);

    tracing::info!(
        year = election.year,
        algorithm = %settings.algorithm,
        district_seats = result.district_seat_total(),
        leveling_seats = result.leveling_seat_distribution.len(),
        "computation finished"
    );
    Ok(result)
}

/// Load a bundle file, select `year` and compute its historical result.
pub fn run_from_bundle_path(
    path: &Path,
    year: u16,
    opts: YearOptions,
) -> Result<(ComputationPayload, LagueDhontResult), EngineError> {
    let bundle = sv_io::load_bundle(path)?;
    let payload = select_year(&bundle, year, opts)?;
    let result = compute(&payload)?;
    Ok((payload, result))
}
