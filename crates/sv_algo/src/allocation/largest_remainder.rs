//! Largest fraction (Hare / Droop quota) allocation.
//!
//! Contract:
//! - Quota over the eligible total `V` for `m` seats:
//!   Hare `floor(V / m)`, Droop `floor(V / (m + 1)) + 1`, never below 1.
//! - Seats are still emitted one at a time: each round the party with the
//!   largest `v − s·q` wins. Whole quotas are therefore taken first, then the
//!   largest remainders, and the reported value `(v − s·q) / q` never rises.
//! - Ties on equal remainders go to the smallest `PartyCode`.
//! - Integer math only (i128 remainders).

use std::collections::BTreeMap;

use sv_core::determinism::pick_best;
use sv_core::ids::PartyCode;
use sv_core::results::{SeatQuotient, SeatResult};
use sv_core::variables::QuotaKind;

/// Quota for `total` votes and `seats` seats (≥ 1 so division is defined).
pub fn quota(total: u64, seats: u32, kind: QuotaKind) -> u64 {
    let m = u64::from(seats);
    let q = match kind {
        QuotaKind::Hare if m == 0 => total,
        QuotaKind::Hare => total / m,
        QuotaKind::Droop => total / (m + 1) + 1,
    };
    q.max(1)
}

/// Award `seats` seats by largest fraction. Returns the quota used and the
/// award sequence.
pub fn allocate_largest_remainder(
    seats: u32,
    eligible: &BTreeMap<PartyCode, u64>,
    kind: QuotaKind,
) -> (u64, Vec<SeatResult>) {
    let total: u64 = eligible.values().sum();
    let q = quota(total, seats, kind);

    let mut held: BTreeMap<&PartyCode, u32> = eligible.keys().map(|k| (k, 0)).collect();
    let mut awards = Vec::with_capacity(seats as usize);

    for seat_number in 1..=seats {
        let rows: Vec<(&PartyCode, i128, SeatQuotient)> = eligible
            .iter()
            .map(|(code, &v)| {
                let s = held.get(code).copied().unwrap_or(0);
                let rest = i128::from(v) - i128::from(s) * i128::from(q);
                let row = SeatQuotient {
                    party_code: code.clone(),
                    votes: v,
                    seats_before: s,
                    divisor: q as f64,
                    quotient: rest as f64 / q as f64,
                };
                (code, rest, row)
            })
            .collect();

        let Some((winner, rest)) = pick_best(rows.iter().map(|(c, r, _)| (*c, *r))) else {
            break;
        };
        let winner = winner.clone();
        if let Some(s) = held.get_mut(&winner) {
            *s += 1;
        }
        awards.push(SeatResult {
            seat_number,
            winner,
            value: rest as f64 / q as f64,
            party_quotients: rows.into_iter().map(|(_, _, r)| r).collect(),
        });
    }
    (q, awards)
}
