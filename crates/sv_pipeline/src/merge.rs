//! crates/sv_pipeline/src/merge.rs
//! District merger: fold legacy counties into the counties of the 2020
//! regional reform so older elections can be compared on today's map.
//!
//! - Order-preserving: a merged district takes the position of the first
//!   of its sources; untouched districts keep theirs.
//! - Votes, seats, population and area are summed per target.
//! - Idempotent: input without any source district comes back unchanged.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use sv_core::entities::{District, Election, Metrics, Votes};
use sv_core::ids::{DistrictId, PartyCode};
use sv_core::variables::SeatLaw;

/// Legacy county → merged county. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistrictMap(BTreeMap<DistrictId, DistrictId>);

impl DistrictMap {
    /// Build from `(source, target)` name pairs; malformed names are skipped.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self(
            pairs
                .into_iter()
                .filter_map(|(from, to)| Some((from.parse().ok()?, to.parse().ok()?)))
                .collect(),
        )
    }

    /// Target for `name`, or `name` itself when it is not merged.
    pub fn target<'a>(&'a self, name: &'a DistrictId) -> &'a DistrictId {
        self.0.get(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const REFORM_2020: &[(&str, &str)] = &[
    ("Østfold", "Viken"),
    ("Akershus", "Viken"),
    ("Buskerud", "Viken"),
    ("Hedmark", "Innlandet"),
    ("Oppland", "Innlandet"),
    ("Vestfold", "Vestfold og Telemark"),
    ("Telemark", "Vestfold og Telemark"),
    ("Aust-Agder", "Agder"),
    ("Vest-Agder", "Agder"),
    ("Hordaland", "Vestland"),
    ("Sogn og Fjordane", "Vestland"),
    ("Sør-Trøndelag", "Trøndelag"),
    ("Nord-Trøndelag", "Trøndelag"),
    ("Troms", "Troms og Finnmark"),
    ("Finnmark", "Troms og Finnmark"),
];

/// The county map after the 2020 regional reform.
pub static DISTRICT_MAP: Lazy<DistrictMap> = Lazy::new(|| DistrictMap::from_pairs(REFORM_2020.iter().copied()));

/// Merging only makes sense where district seats are redistributed by the
/// area formula, and only when the caller asked for it.
pub fn should_merge(year: u16, requested: bool) -> bool {
    requested && SeatLaw::for_year(year).distributes_district_seats()
}

/// Merge all three record sets with one map.
pub fn merge(
    election: &Election,
    votes: &[Votes],
    metrics: &[Metrics],
    map: &DistrictMap,
) -> (Election, Vec<Votes>, Vec<Metrics>) {
    let out = (merge_election(election, map), merge_votes(votes, map), merge_metrics(metrics, map));
    tracing::debug!(
        year = election.year,
        before = election.districts.len(),
        after = out.0.districts.len(),
        "districts merged"
    );
    out
}

pub fn merge_election(election: &Election, map: &DistrictMap) -> Election {
    let mut districts: Vec<District> = Vec::with_capacity(election.districts.len());
    let mut index: BTreeMap<DistrictId, usize> = BTreeMap::new();
    for d in &election.districts {
        let target = map.target(&d.name);
        match index.get(target) {
            Some(&i) => districts[i].seats += d.seats,
            None => {
                index.insert(target.clone(), districts.len());
                districts.push(District { name: target.clone(), seats: d.seats, threshold: d.threshold });
            }
        }
    }
    Election { districts, ..election.clone() }
}

pub fn merge_votes(votes: &[Votes], map: &DistrictMap) -> Vec<Votes> {
    let mut out: Vec<Votes> = Vec::with_capacity(votes.len());
    let mut index: BTreeMap<(u16, DistrictId, PartyCode), usize> = BTreeMap::new();
    for v in votes {
        let target = map.target(&v.district).clone();
        let key = (v.election_year, target, v.party_code.clone());
        match index.get(&key) {
            Some(&i) => out[i].votes += v.votes,
            None => {
                out.push(Votes { district: key.1.clone(), ..v.clone() });
                index.insert(key, out.len() - 1);
            }
        }
    }
    out
}

pub fn merge_metrics(metrics: &[Metrics], map: &DistrictMap) -> Vec<Metrics> {
    let mut out: Vec<Metrics> = Vec::with_capacity(metrics.len());
    let mut index: BTreeMap<(u16, DistrictId), usize> = BTreeMap::new();
    for m in metrics {
        let key = (m.election_year, map.target(&m.district).clone());
        match index.get(&key) {
            Some(&i) => {
                out[i].population += m.population;
                out[i].area += m.area;
            }
            None => {
                out.push(Metrics { district: key.1.clone(), ..m.clone() });
                index.insert(key, out.len() - 1);
            }
        }
    }
    out
}
