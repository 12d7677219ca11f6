//! ALLOCATE stage: apportion every district of the election.
//!
//! Districts are independent, so they run in parallel; the result keeps the
//! election's district order and the first failing district aborts the run.

use std::collections::BTreeMap;

use rayon::prelude::*;

use sv_algo::apportion;
use sv_core::entities::{Election, Votes};
use sv_core::ids::{DistrictId, PartyCode};
use sv_core::results::DistrictResult;
use sv_core::variables::{Method, Threshold};

use crate::EngineError;

/// Votes grouped by district, then party.
pub fn group_votes(votes: &[Votes]) -> BTreeMap<&DistrictId, BTreeMap<PartyCode, u64>> {
    let mut out: BTreeMap<&DistrictId, BTreeMap<PartyCode, u64>> = BTreeMap::new();
    for v in votes {
        *out.entry(&v.district).or_default().entry(v.party_code.clone()).or_insert(0) += v.votes;
    }
    out
}

pub fn allocate_all(
    election: &Election,
    votes: &[Votes],
    method: Method,
    district_threshold: Threshold,
) -> Result<Vec<DistrictResult>, EngineError> {
    let grouped = group_votes(votes);
    let none = BTreeMap::new();

    let results = election
        .districts
        .par_iter()
        .map(|d| {
            let by_party = grouped.get(&d.name).unwrap_or(&none);
            apportion(d, by_party, d.seats, method, district_threshold)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(year = election.year, districts = results.len(), "districts allocated");
    Ok(results)
}
