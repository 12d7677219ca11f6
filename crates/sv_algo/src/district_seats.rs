//! Area-formula distribution of district seats over counties.
//!
//! Each district scores `population + area × area_factor`; the district seats
//! are then apportioned over those scores by plain Sainte-Laguë (1, 3, 5, …).
//! Scores are fixed to thousandths before comparison, ties go to the smallest
//! district name.

use std::collections::BTreeMap;

use sv_core::determinism::{pick_best, Ratio};
use sv_core::entities::Metrics;
use sv_core::ids::DistrictId;
use sv_core::variables::AreaFactor;

use crate::allocation::AllocError;

/// Formula points of one district in thousandths.
pub fn district_points(m: &Metrics, area_factor: AreaFactor) -> u128 {
    let area = if m.area.is_finite() && m.area > 0.0 { m.area } else { 0.0 };
    let area_milli = (area * area_factor.as_f64() * 1_000.0).round() as u128;
    u128::from(m.population) * 1_000 + area_milli
}

/// Distribute `total_seats` over the districts in `metrics`.
///
/// Every district in `metrics` appears in the output, possibly with 0 seats.
/// Repeated rows for one district are summed.
pub fn distribute_district_seats(
    metrics: &[Metrics],
    total_seats: u32,
    area_factor: AreaFactor,
) -> Result<BTreeMap<DistrictId, u32>, AllocError> {
    let mut points: BTreeMap<DistrictId, u128> = BTreeMap::new();
    for m in metrics {
        *points.entry(m.district.clone()).or_insert(0) += district_points(m, area_factor);
    }
    if total_seats > 0 && points.values().all(|&p| p == 0) {
        return Err(AllocError::NoDistricts { seats: total_seats });
    }

    let mut seats: BTreeMap<DistrictId, u32> = points.keys().map(|k| (k.clone(), 0)).collect();
    for _ in 0..total_seats {
        let candidates = points.iter().map(|(d, &p)| {
            let s = seats.get(d).copied().unwrap_or(0);
            (d, Ratio::new(p, 2 * u128::from(s) + 1))
        });
        let Some((winner, _)) = pick_best(candidates) else {
            break;
        };
        let winner = winner.clone();
        if let Some(s) = seats.get_mut(&winner) {
            *s += 1;
        }
    }

    tracing::debug!(districts = seats.len(), seats = total_seats, "district seats distributed");
    Ok(seats)
}
