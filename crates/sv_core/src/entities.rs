//! crates/sv_core/src/entities.rs
//! Input records for one election year: the election configuration, its
//! districts, raw votes, district metrics and the legal parameter set.
//! Pure types + invariants. No I/O.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{DistrictId, PartyCode};
use crate::variables::{AlgorithmType, Threshold};

/// One electoral district (county) of an election.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct District {
    pub name: DistrictId,
    pub seats: u32,
    /// Overrides the run's district threshold for this district only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub threshold: Option<Threshold>,
}

/// A specific year's configuration. Immutable once loaded; a new `Election`
/// is selected on year change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Election {
    pub country_id: i32,
    pub election_type_id: i32,
    pub election_id: i32,
    pub year: u16,
    pub algorithm: AlgorithmType,
    pub first_divisor: f64,
    /// National threshold (percent) for levelling seats.
    pub threshold: f64,
    /// Total district seats.
    pub seats: u32,
    pub leveling_seats: u32,
    pub districts: Vec<District>,
}

impl Election {
    /// Find a district by name (linear scan; districts are few).
    #[inline]
    pub fn district(&self, name: &DistrictId) -> Option<&District> {
        self.districts.iter().find(|d| &d.name == name)
    }

    /// Sum of the configured district seat counts.
    pub fn district_seat_total(&self) -> u32 {
        self.districts.iter().map(|d| d.seats).sum()
    }
}

/// Votes for one party in one district of one election year.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Votes {
    pub election_year: u16,
    pub district: DistrictId,
    pub party_code: PartyCode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub party_name: String,
    pub votes: u64,
}

/// Auxiliary per-district figures used by the area formula.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metrics {
    pub election_year: u16,
    pub district: DistrictId,
    pub population: u64,
    /// Area in km².
    pub area: f64,
}

/// Algorithm section of a parameter set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgorithmSettings {
    pub algorithm: AlgorithmType,
    /// Method-specific numeric parameters, e.g. `"First Divisor": 1.4`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BTreeMap<String, f64>,
}

impl AlgorithmSettings {
    pub const FIRST_DIVISOR_KEY: &'static str = "First Divisor";

    pub fn first_divisor(&self) -> Option<f64> {
        self.parameters.get(Self::FIRST_DIVISOR_KEY).copied()
    }
}

/// The legally defined method configuration for a year. Read-only reference
/// data; `Parameters::unloaded()` stands in when a year has none.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Parameters {
    pub election_year: Option<u16>,
    pub election_type: Option<String>,
    pub algorithm: Option<AlgorithmSettings>,
    pub area_factor: Option<f64>,
    /// Statutory seats per district.
    pub district_seats: BTreeMap<DistrictId, u32>,
    pub leveling_seats: Option<u32>,
    pub threshold: Option<f64>,
    pub total_votes: Option<u64>,
}

impl Parameters {
    /// The fallback parameter set for years without explicit parameters.
    pub fn unloaded() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.election_year.is_some()
    }
}

/// Votes of one district keyed by party, as consumed by the allocators.
pub fn votes_by_party<'a, I>(votes: I, district: &DistrictId) -> BTreeMap<PartyCode, u64>
where
    I: IntoIterator<Item = &'a Votes>,
{
    let mut out = BTreeMap::new();
    for v in votes.into_iter().filter(|v| &v.district == district) {
        *out.entry(v.party_code.clone()).or_insert(0) += v.votes;
    }
    out
}

/// Party display names, first occurrence wins.
pub fn party_names<'a, I>(votes: I) -> BTreeMap<PartyCode, String>
where
    I: IntoIterator<Item = &'a Votes>,
{
    let mut out = BTreeMap::new();
    for v in votes {
        out.entry(v.party_code.clone()).or_insert_with(|| v.party_name.clone());
    }
    out
}
