//! crates/sv_core/src/results.rs
//! Output records of one apportionment run. Computed by the engine, never
//! hand-edited; callers keep independent copies (e.g. historical / current /
//! comparison) and must not mutate them in place.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{DistrictId, PartyCode};
use crate::variables::Method;

/// `100 * part / whole`, or 0 when `whole` is 0.
#[inline]
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Per-party outcome within a district or nationally.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartyResult {
    pub party_code: PartyCode,
    pub party_name: String,
    pub votes: u64,
    pub percent_votes: f64,
    pub district_seats: u32,
    pub leveling_seats: u32,
    pub total_seats: u32,
    /// Vote share minus seat share, in percentage points.
    pub proportionality: f64,
}

impl PartyResult {
    pub fn new(party_code: PartyCode, party_name: String, votes: u64, district_seats: u32) -> Self {
        Self {
            party_code,
            party_name,
            votes,
            percent_votes: 0.0,
            district_seats,
            leveling_seats: 0,
            total_seats: district_seats,
            proportionality: 0.0,
        }
    }

    /// Recompute `total_seats`, `percent_votes` and `proportionality` against
    /// the given totals.
    pub fn recompute_shares(&mut self, total_votes: u64, total_seats: u32) {
        self.total_seats = self.district_seats + self.leveling_seats;
        self.percent_votes = percent(self.votes, total_votes);
        let seat_share = percent(u64::from(self.total_seats), u64::from(total_seats));
        self.proportionality = self.percent_votes - seat_share;
    }
}

/// Canonical presentation order: votes ↓, then party code ↑.
pub fn sort_party_results(rows: &mut [PartyResult]) {
    rows.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.party_code.cmp(&b.party_code)));
}

/// One party's standing in one award round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatQuotient {
    pub party_code: PartyCode,
    pub votes: u64,
    /// Seats the party held when the round started.
    pub seats_before: u32,
    /// Divisor applied this round; the quota for largest-fraction methods.
    pub divisor: f64,
    /// `votes / divisor` for divisor methods, `(votes − seats·quota) / quota`
    /// for largest-fraction methods.
    pub quotient: f64,
}

/// The record of one seat award, in award order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatResult {
    pub seat_number: u32,
    pub winner: PartyCode,
    pub value: f64,
    /// Every eligible party's quotient in this round (party code ↑).
    pub party_quotients: Vec<SeatQuotient>,
}

impl SeatResult {
    pub fn row(&self, party: &PartyCode) -> Option<&SeatQuotient> {
        self.party_quotients.iter().find(|q| &q.party_code == party)
    }

    pub fn winner_row(&self) -> Option<&SeatQuotient> {
        self.row(&self.winner)
    }
}

/// Outcome of one district.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictResult {
    pub name: DistrictId,
    pub votes: u64,
    pub seats: u32,
    pub method: Method,
    /// Quota used by largest-fraction methods.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub quota: Option<u64>,
    pub party_results: Vec<PartyResult>,
    pub seat_results: Vec<SeatResult>,
}

impl DistrictResult {
    /// The last award of the district, the focus of margin analysis.
    #[inline]
    pub fn last_seat(&self) -> Option<&SeatResult> {
        self.seat_results.last()
    }

    pub fn party(&self, code: &PartyCode) -> Option<&PartyResult> {
        self.party_results.iter().find(|p| &p.party_code == code)
    }

    pub fn district_seats_for(&self, code: &PartyCode) -> u32 {
        self.party(code).map_or(0, |p| p.district_seats)
    }

    pub fn votes_for(&self, code: &PartyCode) -> u64 {
        self.party(code).map_or(0, |p| p.votes)
    }
}

/// A national compensatory seat placed in a district.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelingSeat {
    pub party_code: PartyCode,
    pub district: DistrictId,
    /// 1-based levelling round.
    pub seat_number: u32,
    /// Relative district quotient that placed the seat.
    pub quotient: f64,
}

/// One party's quotient in a district during the levelling round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevellingQuotient {
    pub party_code: PartyCode,
    pub quotient: f64,
    pub won_levelling_seat: bool,
}

/// Levelling evidence for one district.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictQuotients {
    pub district: DistrictId,
    pub levelling_seat_rounds: Vec<LevellingQuotient>,
}

/// Complete output of one apportionment run.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagueDhontResult {
    pub district_results: Vec<DistrictResult>,
    pub party_results: Vec<PartyResult>,
    pub leveling_seat_distribution: Vec<LevelingSeat>,
    pub final_quotients: Vec<DistrictQuotients>,
}

impl LagueDhontResult {
    /// Result used before any computation has run.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn district_seat_total(&self) -> u32 {
        self.district_results.iter().map(|d| d.seats).sum()
    }

    pub fn total_seats(&self) -> u32 {
        self.party_results.iter().map(|p| p.total_seats).sum()
    }

    pub fn district(&self, name: &DistrictId) -> Option<&DistrictResult> {
        self.district_results.iter().find(|d| &d.name == name)
    }

    pub fn party(&self, code: &PartyCode) -> Option<&PartyResult> {
        self.party_results.iter().find(|p| &p.party_code == code)
    }
}
