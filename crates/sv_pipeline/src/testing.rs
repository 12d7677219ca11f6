//! Shared fixture for the unit tests: a three-district 2021 election.
//!
//! Modified Sainte-Laguë (1.4) gives Oslo A2 H2, Akershus A2 H1 and
//! Finnmark A2; the single levelling seat goes to V in Oslo.

use sv_core::entities::{District, Election, Metrics, Parameters, Votes};
use sv_core::variables::AlgorithmType;

use crate::payload::ComputationPayload;

pub(crate) fn vote(d: &str, p: &str, n: u64) -> Votes {
    Votes {
        election_year: 2021,
        district: d.parse().unwrap(),
        party_code: p.parse().unwrap(),
        party_name: format!("Party {p}"),
        votes: n,
    }
}

fn metrics(d: &str, population: u64, area: f64) -> Metrics {
    Metrics { election_year: 2021, district: d.parse().unwrap(), population, area }
}

pub(crate) fn election() -> Election {
    let district = |name: &str, seats| District { name: name.parse().unwrap(), seats, threshold: None };
    Election {
        country_id: 1,
        election_type_id: 1,
        election_id: 21,
        year: 2021,
        algorithm: AlgorithmType::ModifiedSainteLague,
        first_divisor: 1.4,
        threshold: 4.0,
        seats: 9,
        leveling_seats: 1,
        districts: vec![district("Oslo", 4), district("Akershus", 3), district("Finnmark", 2)],
    }
}

pub(crate) fn votes() -> Vec<Votes> {
    vec![
        vote("Oslo", "A", 4000),
        vote("Oslo", "H", 3000),
        vote("Oslo", "V", 600),
        vote("Akershus", "A", 3000),
        vote("Akershus", "H", 2500),
        vote("Akershus", "V", 500),
        vote("Finnmark", "A", 1500),
        vote("Finnmark", "H", 500),
        vote("Finnmark", "V", 200),
    ]
}

/// Points 4000 / 3000 / 1900 distribute 9 seats as 4 / 3 / 2.
pub(crate) fn metric_rows() -> Vec<Metrics> {
    vec![metrics("Oslo", 4000, 0.0), metrics("Akershus", 3000, 0.0), metrics("Finnmark", 1000, 500.0)]
}

pub(crate) fn payload() -> ComputationPayload {
    ComputationPayload::historical(election(), votes(), metric_rows(), Parameters::unloaded())
}
