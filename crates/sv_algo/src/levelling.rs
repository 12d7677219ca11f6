//! Levelling (compensatory) seats.
//!
//! Contract:
//! - Qualifying parties have votes and a national share at or above the
//!   threshold.
//! - Each round ranks qualifying parties by the national Sainte-Laguë
//!   quotient `V / d(s)`, where `s` = district seats won + levelling seats
//!   so far (the district seats act as the offset). Ties by `PartyCode`.
//! - The top party takes the seat in its eligible district with the largest
//!   relative quotient `(v_d / d(0)) / (V_d / m_d)`; ties by district name.
//!   Eligible: the party has votes there, won no district seat there and has
//!   no levelling seat there yet.
//! - A party without an eligible district is skipped for that round. If no
//!   party can place the seat, the run fails with `Unsatisfiable`.
//! - District results are not touched; only national rows gain levelling seats.

use std::collections::{BTreeMap, BTreeSet};

use sv_core::determinism::{pick_best, Ratio, StableOrd};
use sv_core::ids::{DistrictId, PartyCode};
use sv_core::results::{
    sort_party_results, DistrictQuotients, DistrictResult, LevelingSeat, LevellingQuotient, PartyResult,
};
use sv_core::variables::{FirstDivisor, Method, Threshold};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevellingError {
    #[error("levelling seat {seat_number} of {requested} has no eligible (party, district) pair")]
    Unsatisfiable { seat_number: u32, requested: u32, awarded: u32 },
}

/// National rows with levelling seats applied, the placed seats in award
/// order, and the per-district quotient evidence.
#[derive(Clone, Debug, PartialEq)]
pub struct LevellingOutcome {
    pub party_results: Vec<PartyResult>,
    pub leveling_seats: Vec<LevelingSeat>,
    pub final_quotients: Vec<DistrictQuotients>,
}

/// Distribute `leveling_seat_count` levelling seats.
pub fn distribute_levelling(
    national: &[PartyResult],
    districts: &[DistrictResult],
    leveling_seat_count: u32,
    threshold: Threshold,
    first_divisor: FirstDivisor,
) -> Result<LevellingOutcome, LevellingError> {
    let sl = Method::SainteLague { first_divisor };
    let total_votes: u64 = national.iter().map(|p| p.votes).sum();
    let district_seat_total: u32 = districts.iter().map(|d| d.seats).sum();

    // Canonical (code) order for the ranking scan.
    let qualifying: BTreeMap<&PartyCode, &PartyResult> = national
        .iter()
        .filter(|p| p.votes > 0 && threshold.is_met(p.votes, total_votes))
        .map(|p| (&p.party_code, p))
        .collect();

    let mut levelled: BTreeMap<&PartyCode, u32> = qualifying.keys().map(|k| (*k, 0)).collect();
    let mut placed: BTreeSet<(PartyCode, DistrictId)> = BTreeSet::new();
    let mut seats: Vec<LevelingSeat> = Vec::with_capacity(leveling_seat_count as usize);

    for seat_number in 1..=leveling_seat_count {
        let mut ranking: Vec<(&PartyCode, Ratio)> = qualifying
            .iter()
            .filter_map(|(code, p)| {
                let s = p.district_seats + levelled.get(code).copied().unwrap_or(0);
                let d = sl.divisor_milli(s)?;
                Some((*code, Ratio::new(u128::from(p.votes) * 1_000, u128::from(d))))
            })
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.stable_cmp(b.0)));

        let mut seat = None;
        for (rank, (code, _)) in ranking.iter().enumerate() {
            let candidates = districts
                .iter()
                .filter(|d| is_eligible(d, code, &placed))
                .map(|d| (&d.name, relative_quotient(d, code, 0, sl)));
            match pick_best(candidates.filter_map(|(n, q)| q.map(|q| (n, q)))) {
                Some((district, q)) => {
                    seat = Some(LevelingSeat {
                        party_code: (*code).clone(),
                        district: district.clone(),
                        seat_number,
                        quotient: q.to_f64(),
                    });
                    break;
                }
                None => {
                    tracing::warn!(
                        party = %code,
                        rank = rank + 1,
                        seat = seat_number,
                        "no eligible district for levelling seat; trying next party"
                    );
                }
            }
        }

        let Some(seat) = seat else {
            return Err(LevellingError::Unsatisfiable {
                seat_number,
                requested: leveling_seat_count,
                awarded: seat_number - 1,
            });
        };
        if let Some(n) = levelled.get_mut(&seat.party_code) {
            *n += 1;
        }
        placed.insert((seat.party_code.clone(), seat.district.clone()));
        seats.push(seat);
    }

    let final_quotients = districts
        .iter()
        .map(|d| DistrictQuotients {
            district: d.name.clone(),
            levelling_seat_rounds: qualifying
                .keys()
                .filter_map(|code| {
                    let s = d.district_seats_for(code);
                    let q = relative_quotient(d, code, s, sl)?;
                    Some(LevellingQuotient {
                        party_code: (*code).clone(),
                        quotient: q.to_f64(),
                        won_levelling_seat: placed.contains(&((*code).clone(), d.name.clone())),
                    })
                })
                .collect(),
        })
        .collect();

    let awarded = seats.len() as u32;
    let mut party_results: Vec<PartyResult> = national
        .iter()
        .map(|p| {
            let mut row = p.clone();
            row.leveling_seats = levelled.get(&p.party_code).copied().unwrap_or(0);
            row.recompute_shares(total_votes, district_seat_total + awarded);
            row
        })
        .collect();
    sort_party_results(&mut party_results);

    tracing::info!(seats = awarded, parties = qualifying.len(), "levelling seats distributed");

    Ok(LevellingOutcome { party_results, leveling_seats: seats, final_quotients })
}

fn is_eligible(d: &DistrictResult, code: &PartyCode, placed: &BTreeSet<(PartyCode, DistrictId)>) -> bool {
    d.votes_for(code) > 0
        && d.district_seats_for(code) == 0
        && !placed.contains(&(code.clone(), d.name.clone()))
}

/// `(v_d / d(s)) / (V_d / m_d)` as an exact ratio; `None` when the party has
/// no votes there or the district has no votes or seats.
fn relative_quotient(d: &DistrictResult, code: &PartyCode, seats_before: u32, sl: Method) -> Option<Ratio> {
    let v = d.votes_for(code);
    if v == 0 || d.votes == 0 || d.seats == 0 {
        return None;
    }
    let div = sl.divisor_milli(seats_before)?;
    Some(Ratio::new(
        u128::from(v) * u128::from(d.seats) * 1_000,
        u128::from(d.votes) * u128::from(div),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::results::SeatResult;

    fn pc(s: &str) -> PartyCode {
        s.parse().unwrap()
    }

    fn row(code: &str, votes: u64, seats: u32) -> PartyResult {
        PartyResult::new(pc(code), String::new(), votes, seats)
    }

    fn district(name: &str, seats: u32, rows: &[(&str, u64, u32)]) -> DistrictResult {
        let party_results: Vec<PartyResult> = rows.iter().map(|(c, v, s)| row(c, *v, *s)).collect();
        DistrictResult {
            name: name.parse().unwrap(),
            votes: rows.iter().map(|r| r.1).sum(),
            seats,
            method: Method::SainteLague { first_divisor: FirstDivisor::NORWEGIAN },
            quota: None,
            party_results,
            seat_results: Vec::<SeatResult>::new(),
        }
    }

    fn national(districts: &[DistrictResult]) -> Vec<PartyResult> {
        let mut acc: BTreeMap<PartyCode, (u64, u32)> = BTreeMap::new();
        for d in districts {
            for p in &d.party_results {
                let e = acc.entry(p.party_code.clone()).or_insert((0, 0));
                e.0 += p.votes;
                e.1 += p.district_seats;
            }
        }
        acc.into_iter().map(|(k, (v, s))| PartyResult::new(k, String::new(), v, s)).collect()
    }

    fn fixture() -> Vec<DistrictResult> {
        vec![
            district("Oslo", 4, &[("A", 500, 2), ("H", 400, 2), ("V", 100, 0)]),
            district("Bergen", 3, &[("A", 450, 2), ("H", 450, 1), ("V", 100, 0)]),
            district("Tromsø", 2, &[("A", 600, 2), ("H", 300, 0), ("V", 100, 0)]),
        ]
    }

    #[test]
    fn under_represented_party_is_compensated() {
        let ds = fixture();
        let nat = national(&ds);
        let out = distribute_levelling(&nat, &ds, 1, Threshold::NONE, FirstDivisor::NORWEGIAN).unwrap();
        // V: 300 / 1.4 = 214 beats H: 1150 / 7 = 164 and A: 1550 / 13 = 119
        assert_eq!(out.leveling_seats.len(), 1);
        assert_eq!(out.leveling_seats[0].party_code, pc("V"));
        // Oslo 100·4/1000 > Bergen 100·3/1000 > Tromsø 100·2/1000
        assert_eq!(out.leveling_seats[0].district.as_str(), "Oslo");

        let v = out.party_results.iter().find(|p| p.party_code == pc("V")).unwrap();
        assert_eq!((v.district_seats, v.leveling_seats, v.total_seats), (0, 1, 1));
        let total: u32 = out.party_results.iter().map(|p| p.total_seats).sum();
        assert_eq!(total, 9 + 1);
    }

    #[test]
    fn threshold_excludes_small_parties() {
        let ds = fixture();
        let nat = national(&ds);
        let t = Threshold::from_percent(12.0).unwrap();
        let out = distribute_levelling(&nat, &ds, 1, t, FirstDivisor::NORWEGIAN).unwrap();
        // V has 10 %: never qualifies.
        assert!(out.leveling_seats.iter().all(|s| s.party_code != pc("V")));
        assert_eq!(out.leveling_seats[0].party_code, pc("H"));
        assert_eq!(out.leveling_seats[0].district.as_str(), "Tromsø");
    }

    #[test]
    fn one_seat_per_party_and_district_then_skip_to_next_party() {
        let ds = fixture();
        let nat = national(&ds);
        let out = distribute_levelling(&nat, &ds, 4, Threshold::NONE, FirstDivisor::NORWEGIAN).unwrap();
        let mut pairs = BTreeSet::new();
        for s in &out.leveling_seats {
            assert!(pairs.insert((s.party_code.clone(), s.district.clone())));
            let d = ds.iter().find(|d| d.name == s.district).unwrap();
            assert_eq!(d.district_seats_for(&s.party_code), 0);
        }
        // V has three eligible districts, H only Tromsø; A none.
        assert!(out.leveling_seats.iter().all(|s| s.party_code != pc("A")));
        assert_eq!(out.leveling_seats.len(), 4);
    }

    #[test]
    fn unsatisfiable_is_surfaced() {
        let ds = fixture();
        let nat = national(&ds);
        // V: 3 districts, H: 1 district → at most 4 placements.
        let err = distribute_levelling(&nat, &ds, 5, Threshold::NONE, FirstDivisor::NORWEGIAN).unwrap_err();
        assert_eq!(err, LevellingError::Unsatisfiable { seat_number: 5, requested: 5, awarded: 4 });
    }

    #[test]
    fn final_quotients_mark_winners() {
        let ds = fixture();
        let nat = national(&ds);
        let out = distribute_levelling(&nat, &ds, 1, Threshold::NONE, FirstDivisor::NORWEGIAN).unwrap();
        assert_eq!(out.final_quotients.len(), 3);
        let oslo = &out.final_quotients[0];
        assert_eq!(oslo.district.as_str(), "Oslo");
        let v = oslo.levelling_seat_rounds.iter().find(|q| q.party_code == pc("V")).unwrap();
        assert!(v.won_levelling_seat);
        assert!((v.quotient - 0.4 / 1.4).abs() < 1e-12);
        let won: usize = out
            .final_quotients
            .iter()
            .flat_map(|d| &d.levelling_seat_rounds)
            .filter(|q| q.won_levelling_seat)
            .count();
        assert_eq!(won, 1);
    }

    #[test]
    fn zero_levelling_seats_is_a_no_op() {
        let ds = fixture();
        let nat = national(&ds);
        let out = distribute_levelling(&nat, &ds, 0, Threshold::NONE, FirstDivisor::NORWEGIAN).unwrap();
        assert!(out.leveling_seats.is_empty());
        assert!(out.party_results.iter().all(|p| p.leveling_seats == 0));
    }
}
