//! crates/sv_pipeline/src/seats.rs
//! Fix the seat count of every district before apportionment.
//!
//! Area-formula years redistribute the run's district seats over the
//! counties from their metrics; fixed-seat years keep the election record.

use std::collections::BTreeSet;

use sv_algo::distribute_district_seats;
use sv_core::entities::{Election, Metrics};
use sv_core::ids::DistrictId;

use crate::payload::{ComputationPayload, RunSettings};
use crate::EngineError;

/// The election with its district seat counts for this run.
pub fn resolve_district_seats(payload: &ComputationPayload, settings: &RunSettings) -> Result<Election, EngineError> {
    let election = &payload.election;
    if !settings.seat_law.distributes_district_seats() {
        return Ok(election.clone());
    }

    let names: BTreeSet<&DistrictId> = election.districts.iter().map(|d| &d.name).collect();
    let rows: Vec<Metrics> = payload.metrics.iter().filter(|m| names.contains(&m.district)).cloned().collect();
    let covered: BTreeSet<&DistrictId> = rows.iter().map(|m| &m.district).collect();
    if covered.len() != names.len() {
        tracing::warn!(
            year = election.year,
            districts = names.len(),
            with_metrics = covered.len(),
            "metrics do not cover every district; keeping fixed district seats"
        );
        return Ok(election.clone());
    }

    let seats = distribute_district_seats(&rows, settings.district_seats, settings.area_factor)?;
    let mut out = election.clone();
    for d in &mut out.districts {
        d.seats = seats.get(&d.name).copied().unwrap_or(0);
    }
    out.seats = out.district_seat_total();
    tracing::debug!(year = election.year, seats = out.seats, "district seats from area formula");
    Ok(out)
}
