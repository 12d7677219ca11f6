//! AGGREGATE stage: national party rows from the district results.
//!
//! National `district_seats` = seats won across districts; shares are
//! against all votes cast and all district seats. Levelling comes later.

use std::collections::BTreeMap;

use sv_core::ids::PartyCode;
use sv_core::results::{sort_party_results, DistrictResult, PartyResult};

/// Fill in display names on every district row.
pub fn attach_names(districts: &mut [DistrictResult], names: &BTreeMap<PartyCode, String>) {
    for d in districts {
        for p in &mut d.party_results {
            if let Some(n) = names.get(&p.party_code) {
                p.party_name.clone_from(n);
            }
        }
    }
}

pub fn national_results(districts: &[DistrictResult], names: &BTreeMap<PartyCode, String>) -> Vec<PartyResult> {
    let mut acc: BTreeMap<&PartyCode, (u64, u32)> = BTreeMap::new();
    for p in districts.iter().flat_map(|d| &d.party_results) {
        let e = acc.entry(&p.party_code).or_insert((0, 0));
        e.0 += p.votes;
        e.1 += p.district_seats;
    }

    let total_votes: u64 = acc.values().map(|e| e.0).sum();
    let total_seats: u32 = districts.iter().map(|d| d.seats).sum();

    let mut rows: Vec<PartyResult> = acc
        .into_iter()
        .map(|(code, (votes, seats))| {
            let name = names.get(code).cloned().unwrap_or_default();
            let mut row = PartyResult::new(code.clone(), name, votes, seats);
            row.recompute_shares(total_votes, total_seats);
            row
        })
        .collect();
    sort_party_results(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::allocate_all;
    use crate::testing::{election, votes};
    use sv_core::entities::party_names;
    use sv_core::variables::{FirstDivisor, Method, Threshold};

    fn districts() -> Vec<DistrictResult> {
        let method = Method::SainteLague { first_divisor: FirstDivisor::NORWEGIAN };
        allocate_all(&election(), &votes(), method, Threshold::NONE).unwrap()
    }

    #[test]
    fn sums_votes_and_seats() {
        let vs = votes();
        let names = party_names(&vs);
        let rows = national_results(&districts(), &names);
        let got: Vec<(&str, u64, u32)> = rows.iter().map(|p| (p.party_code.as_str(), p.votes, p.district_seats)).collect();
        assert_eq!(got, vec![("A", 8500, 6), ("H", 6000, 3), ("V", 1300, 0)]);
        assert_eq!(rows[0].party_name, "Party A");
        assert!((rows[2].percent_votes - 1300.0 / 158.0).abs() < 1e-9);
    }

    #[test]
    fn names_reach_district_rows() {
        let vs = votes();
        let mut ds = districts();
        attach_names(&mut ds, &party_names(&vs));
        assert!(ds.iter().flat_map(|d| &d.party_results).all(|p| p.party_name.starts_with("Party ")));
    }
}
