//! Sainte-Laguë (highest averages with odd divisors) allocation.
//!
//! - Divisors `f, 3, 5, 7, …`; plain Sainte-Laguë has `f = 1`, the modified
//!   Norwegian variant `f = 1.4`.
//! - Divisors are carried in thousandths so every comparison is an exact
//!   u128 cross-multiplication.
//! - Callers pass only eligible parties (votes > 0, threshold met).

use std::collections::BTreeMap;

use sv_core::ids::PartyCode;
use sv_core::results::SeatResult;
use sv_core::variables::{FirstDivisor, Method};

use super::award_by_divisors;

/// Award `seats` seats by Sainte-Laguë with the given first divisor.
/// Returns one `SeatResult` per seat in award order; empty when `seats == 0`.
pub fn allocate_sainte_lague(
    seats: u32,
    eligible: &BTreeMap<PartyCode, u64>,
    first_divisor: FirstDivisor,
) -> Vec<SeatResult> {
    award_by_divisors(seats, eligible, Method::SainteLague { first_divisor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::seats_per_party;

    fn pc(s: &str) -> PartyCode {
        s.parse().unwrap()
    }

    fn votes(rows: &[(&str, u64)]) -> BTreeMap<PartyCode, u64> {
        rows.iter().map(|(k, v)| (pc(k), *v)).collect()
    }

    fn winners(awards: &[SeatResult]) -> Vec<&str> {
        awards.iter().map(|a| a.winner.as_str()).collect()
    }

    #[test]
    fn modified_first_divisor_sequence() {
        // Round 1: A 71429, B 57143, C 21429
        // Round 2: B 57143, A 33333
        // Round 3: A 33333, B 26667
        // Round 4: B 26667, C 21429, A 20000
        let v = votes(&[("A", 100_000), ("B", 80_000), ("C", 30_000)]);
        let awards = allocate_sainte_lague(4, &v, FirstDivisor::NORWEGIAN);
        assert_eq!(winners(&awards), vec!["A", "B", "A", "B"]);

        let first = &awards[0];
        assert_eq!(first.party_quotients.len(), 3);
        let c = first.row(&pc("C")).unwrap();
        assert!((c.divisor - 1.4).abs() < 1e-12);
        assert!((c.quotient - 30_000.0 / 1.4).abs() < 1e-6);

        let last = &awards[3];
        assert_eq!(last.row(&pc("A")).unwrap().seats_before, 2);
        assert!((last.value - 80_000.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn plain_sainte_lague_favours_small_parties_earlier() {
        let v = votes(&[("A", 100_000), ("B", 80_000), ("C", 30_000)]);
        let plain = seats_per_party(&allocate_sainte_lague(7, &v, FirstDivisor::PLAIN));
        let modified = seats_per_party(&allocate_sainte_lague(7, &v, FirstDivisor::NORWEGIAN));
        assert!(plain.get(&pc("C")).copied().unwrap_or(0) >= modified.get(&pc("C")).copied().unwrap_or(0));
        assert_eq!(plain.values().sum::<u32>(), 7);
    }

    #[test]
    fn equal_quotients_go_to_smallest_code() {
        let v = votes(&[("SV", 50), ("A", 50)]);
        let awards = allocate_sainte_lague(1, &v, FirstDivisor::NORWEGIAN);
        assert_eq!(winners(&awards), vec!["A"]);
    }

    #[test]
    fn values_never_increase() {
        let v = votes(&[("A", 1_234), ("B", 987), ("C", 555), ("D", 12)]);
        let awards = allocate_sainte_lague(15, &v, FirstDivisor::NORWEGIAN);
        for w in awards.windows(2) {
            assert!(w[0].value >= w[1].value);
        }
    }
}
