//! Vulnerability of the last seat of a district.
//!
//! Everything here reads the stored quotient row of the last award; nothing is
//! re-apportioned. Extra-vote counts hold every other party fixed (and, for
//! largest-fraction methods, the quota fixed), so they are the margin within
//! that round.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use sv_core::determinism::{pick_best, Ratio, StableOrd};
use sv_core::ids::{DistrictId, PartyCode};
use sv_core::results::{DistrictResult, SeatQuotient};
use sv_core::variables::Method;

/// A losing party at the last seat.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatChallenger {
    pub party_code: PartyCode,
    pub quotient: f64,
    /// Votes the party would need on top of its own to take the seat.
    pub extra_votes: u64,
}

/// The last seat of a district and its two natural challengers.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatVulnerability {
    pub district: DistrictId,
    pub seat_number: u32,
    pub winner: PartyCode,
    pub winner_quotient: f64,
    /// Runner-up by quotient at that round.
    pub by_quotient: SeatChallenger,
    /// Party needing the fewest extra votes. May differ from `by_quotient`
    /// when divisors differ between parties.
    pub by_votes: SeatChallenger,
}

impl SeatVulnerability {
    /// Runner-up quotient relative to the winner's; 1.0 is a dead heat.
    pub fn closeness(&self) -> f64 {
        if self.winner_quotient > 0.0 {
            self.by_quotient.quotient / self.winner_quotient
        } else {
            1.0
        }
    }
}

/// Exact standing of one row, comparable within one district.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Standing {
    Quotient(Ratio),
    Rest(i128),
}

fn standing(method: Method, quota: Option<u64>, row: &SeatQuotient) -> Option<Standing> {
    match method.divisor_milli(row.seats_before) {
        Some(d) => Some(Standing::Quotient(Ratio::new(u128::from(row.votes) * 1_000, u128::from(d)))),
        None => {
            let q = quota?;
            Some(Standing::Rest(i128::from(row.votes) - i128::from(row.seats_before) * i128::from(q)))
        }
    }
}

/// Smallest `x` with `(v + x) / d > v_w / d_w`, or `rest + x > rest_w`.
fn extra_votes(method: Method, quota: Option<u64>, winner: &SeatQuotient, row: &SeatQuotient) -> Option<u64> {
    match (method.divisor_milli(winner.seats_before), method.divisor_milli(row.seats_before)) {
        (Some(dw), Some(d)) => {
            let (dw, d) = (u128::from(dw), u128::from(d));
            let lhs = u128::from(winner.votes) * d;
            let rhs = u128::from(row.votes) * dw;
            let x = if lhs >= rhs { (lhs - rhs) / dw + 1 } else { 0 };
            Some(u64::try_from(x).unwrap_or(u64::MAX))
        }
        _ => {
            let q = i128::from(quota?);
            let rest_w = i128::from(winner.votes) - i128::from(winner.seats_before) * q;
            let rest = i128::from(row.votes) - i128::from(row.seats_before) * q;
            Some(u64::try_from((rest_w - rest + 1).max(0)).unwrap_or(u64::MAX))
        }
    }
}

/// Winner row and loser rows of the last award.
fn last_round(d: &DistrictResult) -> Option<(&SeatQuotient, Vec<&SeatQuotient>)> {
    let last = d.last_seat()?;
    let winner = last.winner_row()?;
    let losers = last.party_quotients.iter().filter(|r| r.party_code != last.winner).collect();
    Some((winner, losers))
}

/// The last seat of `d`, its runner-up by quotient and the party closest in
/// votes. `None` when the district awarded no seat or nobody lost the last one.
pub fn vulnerable_seat(d: &DistrictResult) -> Option<SeatVulnerability> {
    let last = d.last_seat()?;
    let (winner, losers) = last_round(d)?;

    let mut by_q = Vec::with_capacity(losers.len());
    let mut by_v = Vec::with_capacity(losers.len());
    for row in &losers {
        by_q.push((&row.party_code, standing(d.method, d.quota, row)?));
        by_v.push((&row.party_code, Reverse(extra_votes(d.method, d.quota, winner, row)?)));
    }
    let (q_code, _) = pick_best(by_q)?;
    let (v_code, Reverse(v_extra)) = pick_best(by_v)?;

    let challenger = |code: &PartyCode, extra: u64| {
        losers.iter().find(|r| &r.party_code == code).map(|r| SeatChallenger {
            party_code: code.clone(),
            quotient: r.quotient,
            extra_votes: extra,
        })
    };
    let q_extra = losers
        .iter()
        .find(|r| &r.party_code == q_code)
        .and_then(|r| extra_votes(d.method, d.quota, winner, r))?;

    Some(SeatVulnerability {
        district: d.name.clone(),
        seat_number: last.seat_number,
        winner: last.winner.clone(),
        winner_quotient: winner.quotient,
        by_quotient: challenger(q_code, q_extra)?,
        by_votes: challenger(v_code, v_extra)?,
    })
}

/// Extra votes each losing party needs to take the last seat.
pub fn votes_to_last_seat(d: &DistrictResult) -> BTreeMap<PartyCode, u64> {
    let Some((winner, losers)) = last_round(d) else {
        return BTreeMap::new();
    };
    losers
        .into_iter()
        .filter_map(|r| Some((r.party_code.clone(), extra_votes(d.method, d.quota, winner, r)?)))
        .collect()
}

/// Quotient gap between the last seat's winner and each losing party.
pub fn quotients_to_last_seat(d: &DistrictResult) -> BTreeMap<PartyCode, f64> {
    let Some((winner, losers)) = last_round(d) else {
        return BTreeMap::new();
    };
    losers.into_iter().map(|r| (r.party_code.clone(), winner.quotient - r.quotient)).collect()
}

/// The district whose last seat was closest, by `closeness`; ties go to the
/// smallest district name.
pub fn most_vulnerable_seat(districts: &[DistrictResult]) -> Option<SeatVulnerability> {
    districts.iter().filter_map(vulnerable_seat).fold(None, |best, v| match best {
        None => Some(v),
        Some(b) => match v.closeness().total_cmp(&b.closeness()) {
            Ordering::Greater => Some(v),
            Ordering::Equal if v.district.stable_cmp(&b.district) == Ordering::Less => Some(v),
            _ => Some(b),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::apportion;
    use sv_core::entities::District;
    use sv_core::variables::{FirstDivisor, QuotaKind, Threshold};

    fn pc(s: &str) -> PartyCode {
        s.parse().unwrap()
    }

    fn run(name: &str, seats: u32, rows: &[(&str, u64)], method: Method) -> DistrictResult {
        let d = District { name: name.parse().unwrap(), seats, threshold: None };
        let v: BTreeMap<PartyCode, u64> = rows.iter().map(|(k, n)| (pc(k), *n)).collect();
        apportion(&d, &v, seats, method, Threshold::NONE).unwrap()
    }

    #[test]
    fn dhondt_margins() {
        // Last seat: A 60/2 = 30 beats B 40/2 = 20.
        let d = run("Oslo", 3, &[("A", 60), ("B", 40)], Method::DHondt);
        let v = vulnerable_seat(&d).unwrap();
        assert_eq!(v.seat_number, 3);
        assert_eq!(v.winner, pc("A"));
        assert_eq!(v.by_quotient.party_code, pc("B"));
        // (40 + x) / 2 > 60 / 2 → x = 21
        assert_eq!(v.by_quotient.extra_votes, 21);
        assert_eq!(votes_to_last_seat(&d)[&pc("B")], 21);
        assert!((quotients_to_last_seat(&d)[&pc("B")] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn runner_up_by_quotient_and_by_votes_can_differ() {
        // Seat 14 goes to A at 10000/10 = 1000.
        // B 4950/5 = 990 is runner-up by quotient but needs 51 votes;
        // C 980/1 = 980 needs only 21.
        let d = run("Bergen", 14, &[("A", 10_000), ("B", 4_950), ("C", 980)], Method::DHondt);
        let v = vulnerable_seat(&d).unwrap();
        assert_eq!(v.winner, pc("A"));
        assert!((v.winner_quotient - 1_000.0).abs() < 1e-9);
        assert_eq!(v.by_quotient.party_code, pc("B"));
        assert_eq!(v.by_quotient.extra_votes, 51);
        assert_eq!(v.by_votes.party_code, pc("C"));
        assert_eq!(v.by_votes.extra_votes, 21);
    }

    #[test]
    fn by_votes_is_the_smallest_margin() {
        let d = run(
            "Hordaland",
            5,
            &[("A", 50_500), ("B", 30_000), ("C", 13_900)],
            Method::SainteLague { first_divisor: FirstDivisor::NORWEGIAN },
        );
        let v = vulnerable_seat(&d).unwrap();
        let map = votes_to_last_seat(&d);
        let min = map.values().copied().min().unwrap();
        assert_eq!(v.by_votes.extra_votes, min);
        assert!(map.contains_key(&v.by_quotient.party_code));
    }

    #[test]
    fn largest_fraction_margin_holds_quota() {
        // Hare q = 20; last seat D rest 13 beats A rest 1, B rest 9.
        let d = run(
            "Agder",
            5,
            &[("A", 41), ("B", 29), ("C", 17), ("D", 13)],
            Method::LargestFraction { quota: QuotaKind::Hare },
        );
        let v = vulnerable_seat(&d).unwrap();
        assert_eq!(v.winner, pc("D"));
        assert_eq!(v.by_quotient.party_code, pc("B"));
        assert_eq!(v.by_quotient.extra_votes, 13 - 9 + 1);
        assert_eq!(votes_to_last_seat(&d)[&pc("A")], 13);
    }

    #[test]
    fn single_party_has_no_challenger() {
        let d = run("Finnmark", 2, &[("A", 10)], Method::DHondt);
        assert!(vulnerable_seat(&d).is_none());
        assert!(votes_to_last_seat(&d).is_empty());
    }

    #[test]
    fn most_vulnerable_picks_closest_district() {
        let near = run("Troms", 1, &[("A", 100), ("B", 99)], Method::DHondt);
        let far = run("Oslo", 1, &[("A", 100), ("B", 10)], Method::DHondt);
        let got = most_vulnerable_seat(&[far, near]).unwrap();
        assert_eq!(got.district.as_str(), "Troms");
        assert!(got.closeness() > 0.98);
        assert!(most_vulnerable_seat(&[]).is_none());
    }
}
