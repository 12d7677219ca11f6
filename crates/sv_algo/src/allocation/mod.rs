//! District apportionment: one entry point over every method.
//!
//! Contract:
//! - The seat count must match the district's configured seats; a mismatch is
//!   a caller bug and fails before any award is made.
//! - The district threshold (`District.threshold` overrides the run's) is
//!   applied against the district total; zero-vote parties never take part.
//! - Seats are awarded one at a time; each award keeps the full quotient row.
//! - Ties go to the smallest `PartyCode` (see `sv_core::determinism::pick_best`).
//! - Pure integers in every comparison (u128 / i128 cross-multiplication).

pub mod dhondt;
pub mod largest_remainder;
pub mod sainte_lague;

use std::collections::BTreeMap;

use sv_core::determinism::{pick_best, Ratio};
use sv_core::entities::District;
use sv_core::ids::{DistrictId, PartyCode};
use sv_core::results::{sort_party_results, DistrictResult, PartyResult, SeatQuotient, SeatResult};
use sv_core::variables::{Method, Threshold};

pub use dhondt::allocate_dhondt;
pub use largest_remainder::{allocate_largest_remainder, quota};
pub use sainte_lague::allocate_sainte_lague;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("district {district}: {requested} seats requested but {configured} configured")]
    SeatCountMismatch { district: DistrictId, configured: u32, requested: u32 },
    #[error("district {district}: no party is eligible for {seats} seats")]
    NoEligibleParties { district: DistrictId, seats: u32 },
    #[error("no district metrics to distribute {seats} seats over")]
    NoDistricts { seats: u32 },
}

/// Apportion `seat_count` seats of one district among its parties.
///
/// `votes` holds every party that stood in the district; parties that miss
/// the threshold (or have no votes) still appear in `party_results` with zero
/// seats.
pub fn apportion(
    district: &District,
    votes: &BTreeMap<PartyCode, u64>,
    seat_count: u32,
    method: Method,
    district_threshold: Threshold,
) -> Result<DistrictResult, AllocError> {
    if seat_count != district.seats {
        return Err(AllocError::SeatCountMismatch {
            district: district.name.clone(),
            configured: district.seats,
            requested: seat_count,
        });
    }

    let total: u64 = votes.values().sum();
    let threshold = district.threshold.unwrap_or(district_threshold);
    let eligible = eligible_votes(votes, total, threshold);

    if seat_count > 0 && eligible.is_empty() {
        return Err(AllocError::NoEligibleParties { district: district.name.clone(), seats: seat_count });
    }

    let (quota, seat_results) = match method {
        Method::SainteLague { first_divisor } => {
            (None, allocate_sainte_lague(seat_count, &eligible, first_divisor))
        }
        Method::DHondt => (None, allocate_dhondt(seat_count, &eligible)),
        Method::LargestFraction { quota: kind } => {
            let (q, awards) = allocate_largest_remainder(seat_count, &eligible, kind);
            (Some(q), awards)
        }
    };

    let won = seats_per_party(&seat_results);
    let mut party_results: Vec<PartyResult> = votes
        .iter()
        .map(|(code, &v)| {
            let mut row = PartyResult::new(code.clone(), String::new(), v, won.get(code).copied().unwrap_or(0));
            row.recompute_shares(total, seat_count);
            row
        })
        .collect();
    sort_party_results(&mut party_results);

    tracing::debug!(
        district = %district.name,
        seats = seat_count,
        parties = eligible.len(),
        "district apportioned"
    );

    Ok(DistrictResult {
        name: district.name.clone(),
        votes: total,
        seats: seat_count,
        method,
        quota,
        party_results,
        seat_results,
    })
}

/// Parties with votes that meet the threshold, in canonical (code) order.
pub fn eligible_votes(
    votes: &BTreeMap<PartyCode, u64>,
    total: u64,
    threshold: Threshold,
) -> BTreeMap<PartyCode, u64> {
    votes
        .iter()
        .filter(|(_, &v)| v > 0 && threshold.is_met(v, total))
        .map(|(k, &v)| (k.clone(), v))
        .collect()
}

/// Seat counts per party from an award sequence.
pub fn seats_per_party(awards: &[SeatResult]) -> BTreeMap<PartyCode, u32> {
    let mut out = BTreeMap::new();
    for a in awards {
        *out.entry(a.winner.clone()).or_insert(0) += 1;
    }
    out
}

/// Highest-averages award loop shared by the divisor methods.
/// `method` must be a divisor method.
pub(crate) fn award_by_divisors(
    seats: u32,
    eligible: &BTreeMap<PartyCode, u64>,
    method: Method,
) -> Vec<SeatResult> {
    let mut held: BTreeMap<&PartyCode, u32> = eligible.keys().map(|k| (k, 0)).collect();
    let mut awards = Vec::with_capacity(seats as usize);

    for seat_number in 1..=seats {
        let rows: Vec<(&PartyCode, Ratio, SeatQuotient)> = eligible
            .iter()
            .filter_map(|(code, &v)| {
                let s = held.get(code).copied().unwrap_or(0);
                let d = method.divisor_milli(s)?;
                let q = Ratio::new(u128::from(v) * 1_000, u128::from(d));
                let row = SeatQuotient {
                    party_code: code.clone(),
                    votes: v,
                    seats_before: s,
                    divisor: d as f64 / 1_000.0,
                    quotient: q.to_f64(),
                };
                Some((code, q, row))
            })
            .collect();

        let Some((winner, best)) = pick_best(rows.iter().map(|(c, q, _)| (*c, *q))) else {
            break;
        };
        let winner = winner.clone();
        if let Some(s) = held.get_mut(&winner) {
            *s += 1;
        }
        awards.push(SeatResult {
            seat_number,
            winner,
            value: best.to_f64(),
            party_quotients: rows.into_iter().map(|(_, _, r)| r).collect(),
        });
    }
    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::variables::{FirstDivisor, QuotaKind};

    fn pc(s: &str) -> PartyCode {
        s.parse().unwrap()
    }

    fn district(name: &str, seats: u32) -> District {
        District { name: name.parse().unwrap(), seats, threshold: None }
    }

    fn votes(rows: &[(&str, u64)]) -> BTreeMap<PartyCode, u64> {
        rows.iter().map(|(k, v)| (pc(k), *v)).collect()
    }

    #[test]
    fn seat_count_mismatch_is_rejected() {
        let err = apportion(&district("Oslo", 19), &votes(&[("A", 10)]), 18, Method::DHondt, Threshold::NONE)
            .unwrap_err();
        assert!(matches!(err, AllocError::SeatCountMismatch { configured: 19, requested: 18, .. }));
    }

    #[test]
    fn zero_seats_gives_empty_sequence() {
        let r = apportion(&district("Oslo", 0), &votes(&[("A", 10), ("H", 5)]), 0, Method::DHondt, Threshold::NONE)
            .unwrap();
        assert!(r.seat_results.is_empty());
        assert!(r.party_results.iter().all(|p| p.total_seats == 0));
    }

    #[test]
    fn zero_vote_party_never_wins_and_is_still_listed() {
        let r = apportion(
            &district("Finnmark", 5),
            &votes(&[("A", 10), ("H", 0)]),
            5,
            Method::SainteLague { first_divisor: FirstDivisor::NORWEGIAN },
            Threshold::NONE,
        )
        .unwrap();
        assert_eq!(r.district_seats_for(&pc("A")), 5);
        assert_eq!(r.district_seats_for(&pc("H")), 0);
        assert!(r.party(&pc("H")).is_some());
        assert!(r.seat_results.iter().all(|s| s.row(&pc("H")).is_none()));
    }

    #[test]
    fn no_votes_with_seats_is_an_error() {
        let err = apportion(&district("Oslo", 2), &votes(&[("A", 0)]), 2, Method::DHondt, Threshold::NONE)
            .unwrap_err();
        assert!(matches!(err, AllocError::NoEligibleParties { seats: 2, .. }));
    }

    #[test]
    fn district_threshold_excludes_small_parties() {
        let v = votes(&[("A", 900), ("B", 60), ("C", 40)]);
        let t = Threshold::from_percent(5.0).unwrap();
        let r = apportion(&district("Oslo", 20), &v, 20, Method::DHondt, t).unwrap();
        assert_eq!(r.district_seats_for(&pc("C")), 0);
        assert!(r.district_seats_for(&pc("B")) > 0);

        // The district's own threshold overrides the run's.
        let mut d = district("Oslo", 20);
        d.threshold = Some(Threshold::from_percent(10.0).unwrap());
        let r = apportion(&d, &v, 20, Method::DHondt, t).unwrap();
        assert_eq!(r.district_seats_for(&pc("B")), 0);
        assert_eq!(r.district_seats_for(&pc("A")), 20);
    }

    #[test]
    fn seat_sum_matches_district_and_shares_are_set() {
        let v = votes(&[("A", 41), ("B", 29), ("C", 17), ("D", 13)]);
        let r = apportion(
            &district("Agder", 5),
            &v,
            5,
            Method::LargestFraction { quota: QuotaKind::Hare },
            Threshold::NONE,
        )
        .unwrap();
        assert_eq!(r.quota, Some(20));
        assert_eq!(r.party_results.iter().map(|p| p.total_seats).sum::<u32>(), 5);
        let a = r.party(&pc("A")).unwrap();
        assert!((a.percent_votes - 41.0).abs() < 1e-9);
        assert!((a.proportionality - (41.0 - 40.0)).abs() < 1e-9);
        // votes ↓ order
        assert_eq!(r.party_results[0].party_code, pc("A"));
    }
}
