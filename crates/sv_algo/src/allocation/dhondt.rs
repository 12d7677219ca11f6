//! D'Hondt (highest averages with divisors 1, 2, 3, …) allocation.
//!
//! Same award loop as Sainte-Laguë; only the divisor sequence differs.

use std::collections::BTreeMap;

use sv_core::ids::PartyCode;
use sv_core::results::SeatResult;
use sv_core::variables::Method;

use super::award_by_divisors;

/// Award `seats` seats by D'Hondt over the eligible parties.
pub fn allocate_dhondt(seats: u32, eligible: &BTreeMap<PartyCode, u64>) -> Vec<SeatResult> {
    award_by_divisors(seats, eligible, Method::DHondt)
}
