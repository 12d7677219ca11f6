//! LOAD stage: pick one year out of an election bundle and build its payload.

use sv_core::variables::FIRST_AREA_FORMULA_YEAR;
use sv_io::ElectionBundle;

use crate::merge::{merge, should_merge, DISTRICT_MAP};
use crate::payload::ComputationPayload;
use crate::EngineError;

/// Year the "2021 distribution" comparison takes its metrics from.
pub const DISTRIBUTION_YEAR_2021: u16 = 2021;

/// Comparison switches applied when a year is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YearOptions {
    /// Fold legacy counties into today's (area-formula years only).
    pub merge_districts: bool,
    /// Use the 2021 metrics for any area-formula year.
    pub use_2021_distribution: bool,
}

/// Year whose metrics drive the district seat distribution.
pub fn distribution_year(year: u16, opts: YearOptions) -> u16 {
    if opts.use_2021_distribution && year >= FIRST_AREA_FORMULA_YEAR {
        DISTRIBUTION_YEAR_2021
    } else {
        year
    }
}

/// Historical payload for `year`. Years without a parameter set fall back to
/// the election record.
pub fn select_year(bundle: &ElectionBundle, year: u16, opts: YearOptions) -> Result<ComputationPayload, EngineError> {
    let election = bundle
        .election(year)
        .ok_or_else(|| EngineError::InvalidInput(format!("no election for {year}")))?;
    let mut votes = bundle.votes_for(year);
    let mut metrics = bundle.metrics_for(distribution_year(year, opts));
    let parameters = bundle.parameters_for(year);

    let mut election = election.clone();
    if should_merge(year, opts.merge_districts) {
        (election, votes, metrics) = merge(&election, &votes, &metrics, &DISTRICT_MAP);
    }

    tracing::debug!(
        year,
        districts = election.districts.len(),
        votes = votes.len(),
        metrics = metrics.len(),
        parameters = parameters.is_loaded(),
        "year selected"
    );
    Ok(ComputationPayload::historical(election, votes, metrics, parameters))
}
