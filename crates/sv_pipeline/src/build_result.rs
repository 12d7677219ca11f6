//! BUILD stage: assemble `LagueDhontResult` in canonical order.
//!
//! District results and final quotients are sorted by district name; national
//! rows keep the levelling order (votes ↓, code ↑); levelling seats stay in
//! award order.

use sv_algo::LevellingOutcome;
use sv_core::determinism::sort_by_district;
use sv_core::results::{DistrictResult, LagueDhontResult};

pub fn build_result(mut districts: Vec<DistrictResult>, outcome: LevellingOutcome) -> LagueDhontResult {
    let LevellingOutcome { party_results, leveling_seats, mut final_quotients } = outcome;
    sort_by_district(&mut districts, |d| &d.name);
    sort_by_district(&mut final_quotients, |q| &q.district);

    LagueDhontResult {
        district_results: districts,
        party_results,
        leveling_seat_distribution: leveling_seats,
        final_quotients,
    }
}
